use axum::{routing::post, Router};
use crate::state::AppState;
use crate::handlers::pricing;
use crate::middleware::auth::identify;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pricing/calculate", post(pricing::calculate_price))
        .route_layer(axum::middleware::from_fn(identify))
}
