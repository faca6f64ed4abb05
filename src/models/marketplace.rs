use rust_decimal::Decimal;

#[derive(Debug, sqlx::FromRow)]
pub struct Marketplace {
    pub id: i64,
    pub name: String,
    pub service_fee: Decimal,
    pub is_active: bool,
}

#[derive(Debug, sqlx::FromRow)]
pub struct Carrier {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
}
