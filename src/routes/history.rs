use axum::{routing::get, Router};
use crate::state::AppState;
use crate::handlers::history;
use crate::middleware::auth::require_auth;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/history/calculations", get(history::list_calculations))
        .route_layer(axum::middleware::from_fn(require_auth))
}
