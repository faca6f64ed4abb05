// src/handlers/shipping.rs
use axum::{extract::State, Extension, Json};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use crate::dtos::shipping::{ShippingQuoteRequest, ShippingQuoteResponse};
use crate::error::AppError;
use crate::middleware::auth::Identity;
use crate::models::marketplace::{Carrier, Marketplace};
use crate::pricing::desi;
use crate::state::AppState;

pub const DEFAULT_PRODUCT_NAME: &str = "product";

// POST /shipping/calculate
#[instrument(skip(state, identity, req))]
pub async fn calculate_shipping(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<ShippingQuoteRequest>,
) -> Result<Json<ShippingQuoteResponse>, AppError> {
    let email = normalize_email(&req.email)?;
    let user_id = identity.owner_for(&email)?;
    let product_name = req
        .product_name
        .unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_string());

    let marketplace =
        super::marketplace::fetch_active_marketplace(&state.db_pool, req.marketplace_id).await?;
    let carrier =
        super::marketplace::fetch_active_carrier(&state.db_pool, req.carrier_id).await?;

    let weight = desi::billable_weight(req.width, req.length, req.height, req.net_weight)?;
    let shipping_cost =
        resolve_tariff(&state.db_pool, &marketplace, &carrier, weight.bracket).await?;

    sqlx::query(
        "INSERT INTO shipping_history
         (user_id, email, product_name, marketplace_id, carrier_id, billable_weight, bracket, shipping_cost)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(user_id)
    .bind(&email)
    .bind(&product_name)
    .bind(marketplace.id)
    .bind(carrier.id)
    .bind(weight.billable.round_dp(2))
    .bind(weight.bracket)
    .bind(shipping_cost)
    .execute(&state.db_pool)
    .await?;

    Ok(Json(ShippingQuoteResponse {
        email,
        product_name,
        marketplace: marketplace.name,
        carrier: carrier.name,
        volumetric: weight.volumetric.round_dp(2),
        billable: weight.billable.round_dp(2),
        bracket: weight.bracket,
        shipping_cost,
    }))
}

/// Tariff lookup for (marketplace, carrier, bracket). Lookup order matters:
/// the carrier link is checked first even when a rate row happens to exist.
pub async fn resolve_tariff(
    db_pool: &PgPool,
    marketplace: &Marketplace,
    carrier: &Carrier,
    bracket: i32,
) -> Result<Decimal, AppError> {
    let linked = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(
             SELECT 1 FROM marketplace_carriers
             WHERE marketplace_id = $1 AND carrier_id = $2
         )",
    )
    .bind(marketplace.id)
    .bind(carrier.id)
    .fetch_one(db_pool)
    .await?;

    if !linked {
        return Err(AppError::carrier_not_servicing(format!(
            "{} does not service {}",
            carrier.name, marketplace.name
        )));
    }

    let bracket_id = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM weight_brackets WHERE marketplace_id = $1 AND bracket = $2",
    )
    .bind(marketplace.id)
    .bind(bracket)
    .fetch_optional(db_pool)
    .await?
    .ok_or_else(|| {
        AppError::tariff_not_found(format!(
            "No tariff defined for weight bracket {} on {}",
            bracket, marketplace.name
        ))
    })?;

    let price = sqlx::query_scalar::<_, Decimal>(
        "SELECT price FROM tariff_rates
         WHERE marketplace_id = $1 AND carrier_id = $2 AND weight_bracket_id = $3",
    )
    .bind(marketplace.id)
    .bind(carrier.id)
    .bind(bracket_id)
    .fetch_optional(db_pool)
    .await?
    .ok_or_else(|| {
        AppError::tariff_not_found(format!(
            "No tariff for {} at weight bracket {} on {}",
            carrier.name, bracket, marketplace.name
        ))
    })?;

    Ok(price)
}

pub fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::validation("email is not a valid address"));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  A@X.Com ").unwrap(), "a@x.com");
    }

    #[test]
    fn blank_or_malformed_email_is_rejected() {
        assert!(normalize_email("   ").is_err());
        assert!(normalize_email("not-an-address").is_err());
    }
}
