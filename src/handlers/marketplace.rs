// src/handlers/marketplace.rs
use axum::{
    extract::{Path, State},
    Json,
};
use sqlx::PgPool;
use tracing::instrument;

use crate::dtos::marketplace::{CarrierResponse, MarketplaceResponse};
use crate::error::AppError;
use crate::models::marketplace::{Carrier, Marketplace};
use crate::state::AppState;

// GET /marketplaces - active marketplaces for the selection dropdown
#[instrument(skip(state))]
pub async fn list_marketplaces(
    State(state): State<AppState>,
) -> Result<Json<Vec<MarketplaceResponse>>, AppError> {
    let marketplaces = sqlx::query_as::<_, Marketplace>(
        "SELECT id, name, service_fee, is_active
         FROM marketplaces WHERE is_active ORDER BY name",
    )
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(
        marketplaces
            .into_iter()
            .map(|m| MarketplaceResponse { id: m.id, name: m.name, service_fee: m.service_fee })
            .collect(),
    ))
}

// GET /marketplaces/:id/carriers - active carriers servicing the marketplace
#[instrument(skip(state))]
pub async fn list_carriers(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<CarrierResponse>>, AppError> {
    let marketplace = fetch_active_marketplace(&state.db_pool, id).await?;

    let carriers = sqlx::query_as::<_, Carrier>(
        "SELECT c.id, c.name, c.is_active
         FROM carriers c
         JOIN marketplace_carriers mc ON mc.carrier_id = c.id
         WHERE mc.marketplace_id = $1 AND c.is_active
         ORDER BY c.name",
    )
    .bind(marketplace.id)
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(
        carriers
            .into_iter()
            .map(|c| CarrierResponse { id: c.id, name: c.name })
            .collect(),
    ))
}

/// Loads a marketplace and rejects inactive ones: calculations must not be
/// possible against a disabled sales channel.
pub async fn fetch_active_marketplace(
    db_pool: &PgPool,
    id: i64,
) -> Result<Marketplace, AppError> {
    let marketplace = sqlx::query_as::<_, Marketplace>(
        "SELECT id, name, service_fee, is_active FROM marketplaces WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Marketplace not found"))?;

    if !marketplace.is_active {
        return Err(AppError::validation(format!(
            "Marketplace '{}' is not active",
            marketplace.name
        )));
    }

    Ok(marketplace)
}

pub async fn fetch_active_carrier(db_pool: &PgPool, id: i64) -> Result<Carrier, AppError> {
    let carrier = sqlx::query_as::<_, Carrier>(
        "SELECT id, name, is_active FROM carriers WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Carrier not found"))?;

    if !carrier.is_active {
        return Err(AppError::validation(format!(
            "Carrier '{}' is not active",
            carrier.name
        )));
    }

    Ok(carrier)
}
