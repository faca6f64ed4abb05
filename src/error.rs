// src/error.rs
use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    DatabaseError(sqlx::Error),
    Unauthorized(String),
    NotFound(String),
    /// No tariff row for the (marketplace, carrier, bracket) key.
    TariffNotFound(String),
    /// No commission rate matches the category path.
    CommissionRateNotFound(String),
    ValidationError(String),
    /// Carrier has no link to the requested marketplace.
    CarrierNotServicing(String),
    /// Deduction percentages sum to 100% or more; no finite price exists.
    InfeasiblePricing(String),
    /// Supplied email does not match the authenticated caller's email.
    IdentityMismatch(String),
    Conflict(String),
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::ValidationError(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn tariff_not_found(msg: impl Into<String>) -> Self {
        AppError::TariffNotFound(msg.into())
    }

    pub fn commission_rate_not_found(msg: impl Into<String>) -> Self {
        AppError::CommissionRateNotFound(msg.into())
    }

    pub fn carrier_not_servicing(msg: impl Into<String>) -> Self {
        AppError::CarrierNotServicing(msg.into())
    }

    pub fn infeasible(msg: impl Into<String>) -> Self {
        AppError::InfeasiblePricing(msg.into())
    }

    pub fn identity_mismatch(msg: impl Into<String>) -> Self {
        AppError::IdentityMismatch(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn db(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err)
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::DatabaseError(_) => "database_error",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::NotFound(_) => "not_found",
            AppError::TariffNotFound(_) => "tariff_not_found",
            AppError::CommissionRateNotFound(_) => "commission_rate_not_found",
            AppError::ValidationError(_) => "invalid_input",
            AppError::CarrierNotServicing(_) => "carrier_not_servicing_marketplace",
            AppError::InfeasiblePricing(_) => "infeasible_pricing",
            AppError::IdentityMismatch(_) => "identity_mismatch",
            AppError::Conflict(_) => "conflict",
            AppError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, error_message) = match self {
            AppError::DatabaseError(e) => {
                tracing::error!(error = %e, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error occurred".to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!(%msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::TariffNotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::CommissionRateNotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::CarrierNotServicing(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InfeasiblePricing(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::IdentityMismatch(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(json!({
            "error": error_message,
            "code": code,
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_codes_are_stable() {
        assert_eq!(AppError::validation("x").code(), "invalid_input");
        assert_eq!(AppError::carrier_not_servicing("x").code(), "carrier_not_servicing_marketplace");
        assert_eq!(AppError::infeasible("x").code(), "infeasible_pricing");
        assert_eq!(AppError::identity_mismatch("x").code(), "identity_mismatch");
        assert_eq!(AppError::not_found("x").code(), "not_found");
        assert_eq!(AppError::tariff_not_found("x").code(), "tariff_not_found");
        assert_eq!(
            AppError::commission_rate_not_found("x").code(),
            "commission_rate_not_found"
        );
        assert_eq!(AppError::unauthorized("x").code(), "unauthorized");
    }
}
