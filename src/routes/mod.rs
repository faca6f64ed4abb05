pub mod commission;
pub mod history;
pub mod marketplaces;
pub mod pricing;
pub mod shipping;
pub mod users;

use axum::Router;
use crate::state::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(marketplaces::routes())
        .merge(shipping::routes())
        .merge(commission::routes())
        .merge(pricing::routes())
        .merge(history::routes())
        .merge(users::routes())
}
