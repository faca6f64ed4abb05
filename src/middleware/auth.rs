use axum::response::{Response, IntoResponse};
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use serde::Serialize;

use crate::auth::jwt::verify_token;
use crate::error::AppError;

#[derive(Clone)]
pub struct AuthContext {
    pub user_id: i64,
    pub username: String,
    pub email: String,
}

/// Caller identity for endpoints that allow guests: `None` when no bearer
/// token was sent.
#[derive(Clone)]
pub struct Identity(pub Option<AuthContext>);

impl Identity {
    /// Resolves the owning user for a calculation made under `email`.
    /// Authenticated callers must use their own email; guests own nothing.
    pub fn owner_for(&self, email: &str) -> Result<Option<i64>, AppError> {
        match &self.0 {
            Some(auth) if !auth.email.eq_ignore_ascii_case(email) => {
                Err(AppError::identity_mismatch(
                    "The supplied email does not match the email you are logged in with",
                ))
            }
            Some(auth) => Ok(Some(auth.user_id)),
            None => Ok(None),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody { error: String, code: &'static str }

pub async fn require_auth(mut req: Request<axum::body::Body>, next: Next) -> Response {
    let ctx = match bearer_context(&req) {
        Ok(Some(ctx)) => ctx,
        Ok(None) => return unauthorized("Missing Authorization header"),
        Err(resp) => return resp,
    };

    req.extensions_mut().insert(ctx);
    next.run(req).await
}

/// Like `require_auth` but guests pass through with an empty identity. A
/// token that is present but invalid is still rejected.
pub async fn identify(mut req: Request<axum::body::Body>, next: Next) -> Response {
    let identity = match bearer_context(&req) {
        Ok(ctx) => Identity(ctx),
        Err(resp) => return resp,
    };

    req.extensions_mut().insert(identity);
    next.run(req).await
}

fn bearer_context(req: &Request<axum::body::Body>) -> Result<Option<AuthContext>, Response> {
    let auth_header = match req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok()) {
        Some(h) => h,
        None => return Ok(None),
    };

    // Expect "Bearer <token>"
    let token = match auth_header.strip_prefix("Bearer ") {
        Some(t) => t,
        None => return Err(unauthorized("Invalid Authorization format")),
    };

    let secret = match std::env::var("JWT_SECRET") {
        Ok(s) => s,
        Err(_) => return Err(unauthorized("Server auth misconfiguration")),
    };

    let claims = match verify_token(token, &secret) {
        Ok(c) => c,
        Err(e) => return Err(e.into_response()),
    };

    Ok(Some(AuthContext {
        user_id: claims.sub,
        username: claims.username,
        email: claims.email,
    }))
}

fn unauthorized(msg: &str) -> Response {
    let body = axum::Json(ErrorBody { error: msg.to_string(), code: "unauthorized" });
    (StatusCode::UNAUTHORIZED, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(email: &str) -> Identity {
        Identity(Some(AuthContext {
            user_id: 7,
            username: "seller".to_string(),
            email: email.to_string(),
        }))
    }

    #[test]
    fn guest_owns_nothing() {
        assert_eq!(Identity(None).owner_for("a@x.com").unwrap(), None);
    }

    #[test]
    fn matching_email_is_case_insensitive() {
        assert_eq!(identity("A@X.com").owner_for("a@x.com").unwrap(), Some(7));
    }

    #[test]
    fn mismatched_email_is_rejected() {
        assert!(matches!(
            identity("a@x.com").owner_for("b@y.com"),
            Err(AppError::IdentityMismatch(_))
        ));
    }
}
