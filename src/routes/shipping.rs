use axum::{routing::post, Router};
use crate::state::AppState;
use crate::handlers::shipping;
use crate::middleware::auth::identify;

pub fn routes() -> Router<AppState> {
    // Guests may calculate; a bearer token, when present, must be valid.
    Router::new()
        .route("/shipping/calculate", post(shipping::calculate_shipping))
        .route_layer(axum::middleware::from_fn(identify))
}
