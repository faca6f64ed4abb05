use axum::{routing::{get, post}, Router};
use crate::state::AppState;
use crate::handlers::user;
use crate::middleware::auth::require_auth;

pub fn routes() -> Router<AppState> {
    // Registration and login are open; profile lookup needs a valid token.
    Router::new()
        .route("/users/register", post(user::register_user))
        .route("/users/login", post(user::login_user))
        .merge(
            Router::new()
                .route("/users/me", get(user::get_me))
                .route_layer(axum::middleware::from_fn(require_auth)),
        )
}
