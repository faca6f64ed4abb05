use serde::Serialize;
use rust_decimal::Decimal;

#[derive(Serialize)]
pub struct MarketplaceResponse {
    pub id: i64,
    pub name: String,
    pub service_fee: Decimal,
}

#[derive(Serialize)]
pub struct CarrierResponse {
    pub id: i64,
    pub name: String,
}
