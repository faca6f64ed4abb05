// src/handlers/history.rs
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use crate::dtos::history::{
    CalculationItemResponse, CalculationResponse, HistoryQuery, OwnerCalculations,
};
use crate::error::AppError;
use crate::state::AppState;

/// Synthetic owner bucket for records that were created without a login.
const GUEST_BUCKET: &str = "guests";

#[derive(sqlx::FromRow)]
struct CalculationRow {
    id: i64,
    user_id: Option<i64>,
    username: Option<String>,
    email: String,
    total_price: Decimal,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: i64,
    calculation_id: i64,
    product_name: String,
    product_cost: Decimal,
    packaging_cost: Decimal,
    service_fee: Decimal,
    carrier_name: String,
    shipping_cost: Decimal,
    billable_weight: Decimal,
    category_path: String,
    commission_rate: Decimal,
    commission_amount: Decimal,
    withholding_rate: Decimal,
    withholding_amount: Decimal,
    margin_rate: Decimal,
    margin_amount: Decimal,
    vat_rate: Decimal,
    vat_amount: Decimal,
    price_excl_vat: Decimal,
    price_incl_vat: Decimal,
}

// GET /history/calculations?username=&include_guests=
//
// Records grouped per owning user; guest records appear under a synthetic
// bucket only when requested and no username filter is set.
#[instrument(skip(state))]
pub async fn list_calculations(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Vec<OwnerCalculations>>, AppError> {
    let mut query_str = String::from(
        "SELECT c.id, c.user_id, u.username, c.email, c.total_price, c.created_at
         FROM calculations c
         LEFT JOIN users u ON u.id = c.user_id",
    );

    if params.username.is_some() {
        query_str.push_str(" WHERE u.username = $1");
    } else if !params.include_guests {
        query_str.push_str(" WHERE c.user_id IS NOT NULL");
    }
    query_str.push_str(" ORDER BY u.username NULLS LAST, c.created_at DESC, c.id DESC");

    let mut query = sqlx::query_as::<_, CalculationRow>(&query_str);
    if let Some(username) = &params.username {
        query = query.bind(username);
    }
    let rows = query.fetch_all(&state.db_pool).await?;

    if rows.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let item_rows = sqlx::query_as::<_, ItemRow>(
        "SELECT id, calculation_id, product_name, product_cost, packaging_cost,
                service_fee, carrier_name, shipping_cost, billable_weight,
                category_path, commission_rate, commission_amount,
                withholding_rate, withholding_amount, margin_rate, margin_amount,
                vat_rate, vat_amount, price_excl_vat, price_incl_vat
         FROM calculation_items
         WHERE calculation_id = ANY($1)
         ORDER BY id",
    )
    .bind(&ids)
    .fetch_all(&state.db_pool)
    .await?;

    let mut items_by_calculation: std::collections::HashMap<i64, Vec<CalculationItemResponse>> =
        std::collections::HashMap::new();
    for item in item_rows {
        items_by_calculation
            .entry(item.calculation_id)
            .or_default()
            .push(CalculationItemResponse {
                id: item.id,
                product_name: item.product_name,
                product_cost: item.product_cost,
                packaging_cost: item.packaging_cost,
                service_fee: item.service_fee,
                carrier_name: item.carrier_name,
                shipping_cost: item.shipping_cost,
                billable_weight: item.billable_weight,
                category_path: item.category_path,
                commission_rate: item.commission_rate,
                commission_amount: item.commission_amount,
                withholding_rate: item.withholding_rate,
                withholding_amount: item.withholding_amount,
                margin_rate: item.margin_rate,
                margin_amount: item.margin_amount,
                vat_rate: item.vat_rate,
                vat_amount: item.vat_amount,
                price_excl_vat: item.price_excl_vat,
                price_incl_vat: item.price_incl_vat,
            });
    }

    // Rows arrive sorted by owner, so grouping preserves that order.
    let mut groups: Vec<OwnerCalculations> = Vec::new();
    for row in rows {
        let owner = row
            .username
            .clone()
            .unwrap_or_else(|| GUEST_BUCKET.to_string());
        let calculation = CalculationResponse {
            id: row.id,
            email: row.email,
            created_at: row.created_at,
            total_price: row.total_price,
            items: items_by_calculation.remove(&row.id).unwrap_or_default(),
        };

        match groups.last_mut() {
            Some(group) if group.user_id == row.user_id => {
                group.calculations.push(calculation)
            }
            _ => groups.push(OwnerCalculations {
                user_id: row.user_id,
                owner,
                calculations: vec![calculation],
            }),
        }
    }

    Ok(Json(groups))
}

/// Re-owns every guest history row whose email matches the user's, across all
/// three history tables in a single transaction. Partial linking would be
/// worse than failing, so any error aborts the whole batch. Already-owned
/// rows are never touched, which makes repeated logins idempotent.
pub async fn link_guest_records(
    db_pool: &PgPool,
    user_id: i64,
    email: &str,
) -> Result<(), AppError> {
    let mut tx = db_pool.begin().await?;
    let mut linked: u64 = 0;

    for table in ["calculations", "shipping_history", "commission_history"] {
        let result = sqlx::query(&format!(
            "UPDATE {table} SET user_id = $1
             WHERE user_id IS NULL AND lower(email) = lower($2)"
        ))
        .bind(user_id)
        .bind(email)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, table, user_id, "Guest history linking failed");
            AppError::db(e)
        })?;
        linked += result.rows_affected();
    }

    tx.commit().await.map_err(|e| {
        tracing::error!(error = %e, user_id, "Guest history linking commit failed");
        AppError::db(e)
    })?;

    if linked > 0 {
        tracing::info!(user_id, linked, "Linked guest history records to user");
    }
    Ok(())
}
