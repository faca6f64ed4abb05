// src/handlers/commission.rs
use axum::{extract::State, Extension, Json};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use crate::dtos::commission::{CommissionLookupRequest, CommissionLookupResponse};
use crate::error::AppError;
use crate::middleware::auth::Identity;
use crate::models::marketplace::Marketplace;
use crate::state::AppState;

use super::shipping::{normalize_email, DEFAULT_PRODUCT_NAME};

pub const MAX_PATH_DEPTH: usize = 4;

// POST /commission/resolve
#[instrument(skip(state, identity, req))]
pub async fn resolve_commission(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CommissionLookupRequest>,
) -> Result<Json<CommissionLookupResponse>, AppError> {
    let email = normalize_email(&req.email)?;
    let user_id = identity.owner_for(&email)?;
    let product_name = req
        .product_name
        .unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_string());

    let marketplace =
        super::marketplace::fetch_active_marketplace(&state.db_pool, req.marketplace_id).await?;

    let segments = parse_category_path(&req.category_path)?;
    let rate = resolve_commission_rate(&state.db_pool, &marketplace, &segments).await?;
    let category_path = segments.join(" > ");

    sqlx::query(
        "INSERT INTO commission_history
         (user_id, email, product_name, marketplace_id, category_path, commission_rate)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(user_id)
    .bind(&email)
    .bind(&product_name)
    .bind(marketplace.id)
    .bind(&category_path)
    .bind(rate)
    .execute(&state.db_pool)
    .await?;

    Ok(Json(CommissionLookupResponse {
        email,
        product_name,
        marketplace: marketplace.name,
        category_path,
        commission_rate: rate,
    }))
}

/// Splits "L1 > L2 > L3" into trimmed segments. Between 1 and 4 non-empty
/// segments are accepted, matching the depth of the category tree.
pub fn parse_category_path(path: &str) -> Result<Vec<String>, AppError> {
    let segments: Vec<String> = path.split('>').map(|s| s.trim().to_string()).collect();

    if segments.iter().any(|s| s.is_empty()) {
        return Err(AppError::validation(
            "category_path contains an empty segment",
        ));
    }
    if segments.len() > MAX_PATH_DEPTH {
        return Err(AppError::validation(format!(
            "category_path is deeper than {MAX_PATH_DEPTH} levels"
        )));
    }

    Ok(segments)
}

/// Resolves the commission rate for a category path.
///
/// Semantics: strict prefix match. Every provided segment must match the
/// category name at its level; a non-matching segment at any depth makes the
/// whole lookup fail (no silent fallback to shallower matches). Rows deeper
/// than the provided path still qualify. Tie-break is deterministic: the row
/// with the fewest populated levels wins (an exact-depth row beats deeper
/// specializations), then the lowest id.
pub async fn resolve_commission_rate(
    db_pool: &PgPool,
    marketplace: &Marketplace,
    segments: &[String],
) -> Result<Decimal, AppError> {
    let mut query_str = String::from(
        "SELECT cr.rate
         FROM commission_rates cr
         JOIN categories c1 ON c1.id = cr.category_l1
         LEFT JOIN categories c2 ON c2.id = cr.category_l2
         LEFT JOIN categories c3 ON c3.id = cr.category_l3
         LEFT JOIN categories c4 ON c4.id = cr.category_l4
         WHERE cr.marketplace_id = $1",
    );
    for i in 0..segments.len() {
        query_str.push_str(&format!(" AND c{}.name = ${}", i + 1, i + 2));
    }
    query_str.push_str(
        " ORDER BY (cr.category_l2 IS NOT NULL)::int
                 + (cr.category_l3 IS NOT NULL)::int
                 + (cr.category_l4 IS NOT NULL)::int,
                 cr.id
          LIMIT 1",
    );

    let mut query = sqlx::query_scalar::<_, Decimal>(&query_str).bind(marketplace.id);
    for segment in segments {
        query = query.bind(segment);
    }

    query
        .fetch_optional(db_pool)
        .await?
        .ok_or_else(|| {
            AppError::commission_rate_not_found(format!(
                "No commission rate found on {} for category path '{}'",
                marketplace.name,
                segments.join(" > ")
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_trims_segments() {
        let segments = parse_category_path("Elektronik > Telefon >Aksesuar").unwrap();
        assert_eq!(segments, vec!["Elektronik", "Telefon", "Aksesuar"]);
    }

    #[test]
    fn single_segment_path_is_valid() {
        assert_eq!(parse_category_path("Elektronik").unwrap(), vec!["Elektronik"]);
    }

    #[test]
    fn rejects_empty_segments() {
        assert!(parse_category_path("").is_err());
        assert!(parse_category_path("Elektronik > > Telefon").is_err());
        assert!(parse_category_path("Elektronik >").is_err());
    }

    #[test]
    fn rejects_paths_deeper_than_four_levels() {
        assert!(parse_category_path("a > b > c > d > e").is_err());
        assert!(parse_category_path("a > b > c > d").is_ok());
    }
}
