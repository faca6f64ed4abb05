use axum::{routing::post, Router};
use crate::state::AppState;
use crate::handlers::commission;
use crate::middleware::auth::identify;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/commission/resolve", post(commission::resolve_commission))
        .route_layer(axum::middleware::from_fn(identify))
}
