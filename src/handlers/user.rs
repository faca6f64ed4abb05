use bcrypt::{hash, verify, DEFAULT_COST};
use crate::dtos::user::{RegisterUserRequest, UserResponse, LoginRequest, LoginResponse};
use crate::auth::jwt::sign_token;
use crate::error::AppError;
use axum::{extract::State, Json};
use crate::state::AppState;
use crate::middleware::auth::AuthContext;
use crate::models::user::User;
use axum::extract::Extension;

use super::history::link_guest_records;
use super::shipping::normalize_email;

pub async fn register_user(
    State(AppState { db_pool }): State<AppState>,
    Json(payload): Json<RegisterUserRequest>
) -> Result<(axum::http::StatusCode, Json<UserResponse>), AppError> {
    // Basic validation
    if payload.username.trim().is_empty() {
        return Err(AppError::validation("Username required"));
    }
    if payload.password.len() < 6 {
        return Err(AppError::validation("Password too short"));
    }
    let email = normalize_email(&payload.email)?;

    let password_hash = hash(&payload.password, DEFAULT_COST)
        .map_err(|e| AppError::internal(format!("Hash error: {e}")))?;

    let rec = sqlx::query_as::<_, UserInsertReturn>(
        r#"
        INSERT INTO users (username, email, password_hash)
        VALUES ($1, $2, $3)
        RETURNING id, username, email, is_active, created_at
        "#,
    )
    .bind(payload.username.trim())
    .bind(&email)
    .bind(&password_hash)
    .fetch_one(&db_pool)
    .await
    .map_err(|e| {
        if let Some(db_err) = e.as_database_error() {
            if db_err.code().as_deref() == Some("23505") {
                return AppError::conflict("Username or email already exists");
            }
        }
        AppError::db(e)
    })?;

    // Claim any calculations this email made as a guest before registering.
    link_guest_records(&db_pool, rec.id, &rec.email).await?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(UserResponse {
            id: rec.id,
            username: rec.username,
            email: rec.email,
            is_active: rec.is_active,
            created_at: rec.created_at,
        }),
    ))
}

pub async fn login_user(
    State(AppState { db_pool }): State<AppState>,
    Json(payload): Json<LoginRequest>
) -> Result<Json<LoginResponse>, AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError::validation("Username required"));
    }
    if payload.password.is_empty() {
        return Err(AppError::validation("Password required"));
    }

    let user = sqlx::query_as::<_, User>(
        r#"SELECT id, username, email, password_hash, is_active, created_at FROM users WHERE username = $1"#,
    )
    .bind(payload.username.trim())
    .fetch_optional(&db_pool)
    .await?
    // Same status as a bad password so usernames cannot be enumerated
    .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

    if !user.is_active {
        return Err(AppError::conflict("User inactive"));
    }

    let ok = verify(&payload.password, &user.password_hash)
        .map_err(|e| AppError::internal(format!("Password verify error: {e}")))?;

    if !ok {
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::internal("JWT secret not configured"))?;

    let token = sign_token(user.id, &user.username, &user.email, &secret)?;

    // Guest history made under this email becomes owned on every login;
    // already-linked rows are untouched.
    link_guest_records(&db_pool, user.id, &user.email).await?;

    // 8 hours = 28800 seconds
    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "Bearer",
        expires_in_seconds: 8 * 60 * 60,
    }))
}

// Authenticated endpoint: returns full user profile from DB using the id in AuthContext
pub async fn get_me(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>
) -> Result<Json<UserResponse>, AppError> {
    let rec = sqlx::query_as::<_, UserProfileRow>(
        r#"SELECT id, username, email, is_active, created_at FROM users WHERE id = $1"#,
    )
    .bind(auth.user_id)
    .fetch_one(&db_pool)
    .await?;

    Ok(Json(UserResponse {
        id: rec.id,
        username: rec.username,
        email: rec.email,
        is_active: rec.is_active,
        created_at: rec.created_at,
    }))
}

#[derive(sqlx::FromRow)]
struct UserInsertReturn {
    id: i64,
    username: String,
    email: String,
    is_active: bool,
    created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(sqlx::FromRow)]
struct UserProfileRow {
    id: i64,
    username: String,
    email: String,
    is_active: bool,
    created_at: chrono::DateTime<chrono::Utc>,
}
