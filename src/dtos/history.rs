use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub username: Option<String>,
    #[serde(default)]
    pub include_guests: bool,
}

#[derive(Serialize)]
pub struct CalculationItemResponse {
    pub id: i64,
    pub product_name: String,
    pub product_cost: Decimal,
    pub packaging_cost: Decimal,
    pub service_fee: Decimal,
    pub carrier_name: String,
    pub shipping_cost: Decimal,
    pub billable_weight: Decimal,
    pub category_path: String,
    pub commission_rate: Decimal,
    pub commission_amount: Decimal,
    pub withholding_rate: Decimal,
    pub withholding_amount: Decimal,
    pub margin_rate: Decimal,
    pub margin_amount: Decimal,
    pub vat_rate: Decimal,
    pub vat_amount: Decimal,
    pub price_excl_vat: Decimal,
    pub price_incl_vat: Decimal,
}

#[derive(Serialize)]
pub struct CalculationResponse {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub total_price: Decimal,
    pub items: Vec<CalculationItemResponse>,
}

/// One bucket per owner; guest records are grouped under a synthetic owner.
#[derive(Serialize)]
pub struct OwnerCalculations {
    pub user_id: Option<i64>,
    pub owner: String,
    pub calculations: Vec<CalculationResponse>,
}
