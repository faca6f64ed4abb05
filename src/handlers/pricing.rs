// src/handlers/pricing.rs
use axum::{extract::State, Extension, Json};
use axum::http::StatusCode;
use tracing::instrument;

use crate::dtos::pricing::{PriceCalculationRequest, PriceCalculationResponse};
use crate::error::AppError;
use crate::middleware::auth::Identity;
use crate::pricing::desi;
use crate::pricing::solver::{self, round2, SolverInput, WITHHOLDING_RATE};
use crate::state::AppState;

use super::commission::{parse_category_path, resolve_commission_rate};
use super::shipping::{normalize_email, resolve_tariff, DEFAULT_PRODUCT_NAME};

// POST /pricing/calculate
//
// Full pipeline: tariff + commission lookups feed the closed-form solver,
// and the resulting breakdown is persisted as one calculation with one line
// item before being returned.
#[instrument(skip(state, identity, req))]
pub async fn calculate_price(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<PriceCalculationRequest>,
) -> Result<(StatusCode, Json<PriceCalculationResponse>), AppError> {
    let email = normalize_email(&req.email)?;
    let user_id = identity.owner_for(&email)?;
    let product_name = req
        .product_name
        .clone()
        .unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_string());

    let marketplace =
        super::marketplace::fetch_active_marketplace(&state.db_pool, req.marketplace_id).await?;
    let carrier =
        super::marketplace::fetch_active_carrier(&state.db_pool, req.carrier_id).await?;

    let weight = desi::billable_weight(req.width, req.length, req.height, req.net_weight)?;
    let shipping_cost =
        resolve_tariff(&state.db_pool, &marketplace, &carrier, weight.bracket).await?;

    let segments = parse_category_path(&req.category_path)?;
    let commission_rate =
        resolve_commission_rate(&state.db_pool, &marketplace, &segments).await?;
    let category_path = segments.join(" > ");

    let breakdown = solver::solve(&SolverInput {
        product_cost: req.product_cost,
        packaging_cost: req.packaging_cost,
        shipping_cost,
        service_fee: marketplace.service_fee,
        commission_rate,
        withholding_rate: WITHHOLDING_RATE,
        margin_rate: req.margin_rate,
        vat_rate: req.vat_rate,
    })?;

    // One calculation + one line item, atomically.
    let mut tx = state.db_pool.begin().await?;

    let calculation_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO calculations (user_id, email, total_price)
         VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(user_id)
    .bind(&email)
    .bind(breakdown.price_incl_vat)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO calculation_items
         (calculation_id, product_name, product_cost, packaging_cost, service_fee,
          carrier_name, shipping_cost, billable_weight, category_path,
          commission_rate, commission_amount, withholding_rate, withholding_amount,
          margin_rate, margin_amount, vat_rate, vat_amount,
          price_excl_vat, price_incl_vat)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)",
    )
    .bind(calculation_id)
    .bind(&product_name)
    .bind(req.product_cost)
    .bind(req.packaging_cost)
    .bind(marketplace.service_fee)
    .bind(&carrier.name)
    .bind(shipping_cost)
    .bind(weight.billable.round_dp(2))
    .bind(&category_path)
    .bind(breakdown.commission_rate)
    .bind(round2(breakdown.commission_amount))
    .bind(breakdown.withholding_rate)
    .bind(round2(breakdown.withholding_amount))
    .bind(breakdown.margin_rate)
    .bind(round2(breakdown.margin_amount))
    .bind(breakdown.vat_rate)
    .bind(breakdown.vat_amount)
    .bind(breakdown.price_excl_vat)
    .bind(breakdown.price_incl_vat)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(PriceCalculationResponse {
            calculation_id,
            email,
            product_name,
            marketplace: marketplace.name,
            carrier: carrier.name,
            product_cost: req.product_cost,
            packaging_cost: req.packaging_cost,
            service_fee: marketplace.service_fee,
            shipping_cost,
            billable_weight: weight.billable.round_dp(2),
            bracket: weight.bracket,
            category_path,
            commission_rate: breakdown.commission_rate,
            commission_amount: breakdown.commission_amount,
            withholding_rate: breakdown.withholding_rate,
            withholding_amount: breakdown.withholding_amount,
            margin_rate: breakdown.margin_rate,
            margin_amount: breakdown.margin_amount,
            vat_rate: breakdown.vat_rate,
            vat_amount: breakdown.vat_amount,
            price_excl_vat: breakdown.price_excl_vat,
            price_incl_vat: breakdown.price_incl_vat,
        }),
    ))
}
