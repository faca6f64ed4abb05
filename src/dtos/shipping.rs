use serde::{Deserialize, Serialize};
use rust_decimal::Decimal;

use super::de_decimal;

#[derive(Deserialize)]
pub struct ShippingQuoteRequest {
    pub marketplace_id: i64,
    pub carrier_id: i64,
    /// Dimensions in centimeters.
    #[serde(deserialize_with = "de_decimal")]
    pub width: Decimal,
    #[serde(deserialize_with = "de_decimal")]
    pub length: Decimal,
    #[serde(deserialize_with = "de_decimal")]
    pub height: Decimal,
    /// Net weight in kilograms.
    #[serde(deserialize_with = "de_decimal")]
    pub net_weight: Decimal,
    pub email: String,
    pub product_name: Option<String>,
}

#[derive(Serialize)]
pub struct ShippingQuoteResponse {
    pub email: String,
    pub product_name: String,
    pub marketplace: String,
    pub carrier: String,
    pub volumetric: Decimal,
    pub billable: Decimal,
    pub bracket: i32,
    pub shipping_cost: Decimal,
}
