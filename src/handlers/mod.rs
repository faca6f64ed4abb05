// src/handlers/mod.rs
pub mod commission;
pub mod history;
pub mod marketplace;
pub mod pricing;
pub mod shipping;
pub mod user;
