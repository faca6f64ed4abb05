use serde::{Deserialize, Serialize};
use rust_decimal::Decimal;

#[derive(Deserialize)]
pub struct CommissionLookupRequest {
    pub marketplace_id: i64,
    /// Delimited category path, e.g. "Elektronik > Telefon > Aksesuar".
    pub category_path: String,
    pub email: String,
    pub product_name: Option<String>,
}

#[derive(Serialize)]
pub struct CommissionLookupResponse {
    pub email: String,
    pub product_name: String,
    pub marketplace: String,
    pub category_path: String,
    pub commission_rate: Decimal,
}
