use serde::{Deserialize, Serialize};
use rust_decimal::Decimal;

use super::de_decimal;

#[derive(Deserialize)]
pub struct PriceCalculationRequest {
    pub marketplace_id: i64,
    pub carrier_id: i64,
    pub product_name: Option<String>,
    #[serde(deserialize_with = "de_decimal")]
    pub product_cost: Decimal,
    #[serde(deserialize_with = "de_decimal")]
    pub packaging_cost: Decimal,
    #[serde(deserialize_with = "de_decimal")]
    pub width: Decimal,
    #[serde(deserialize_with = "de_decimal")]
    pub length: Decimal,
    #[serde(deserialize_with = "de_decimal")]
    pub height: Decimal,
    #[serde(deserialize_with = "de_decimal")]
    pub net_weight: Decimal,
    pub category_path: String,
    #[serde(deserialize_with = "de_decimal")]
    pub margin_rate: Decimal,
    #[serde(deserialize_with = "de_decimal")]
    pub vat_rate: Decimal,
    pub email: String,
}

/// Full itemized breakdown so the caller can display every cost line, not
/// just the final price.
#[derive(Serialize)]
pub struct PriceCalculationResponse {
    pub calculation_id: i64,
    pub email: String,
    pub product_name: String,
    pub marketplace: String,
    pub carrier: String,
    pub product_cost: Decimal,
    pub packaging_cost: Decimal,
    pub service_fee: Decimal,
    pub shipping_cost: Decimal,
    pub billable_weight: Decimal,
    pub bracket: i32,
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
