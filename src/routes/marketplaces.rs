use axum::{routing::get, Router};
use crate::state::AppState;
use crate::handlers::marketplace;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/marketplaces", get(marketplace::list_marketplaces))
        .route("/marketplaces/{id}/carriers", get(marketplace::list_carriers))
}
