// src/models/mod.rs
pub mod marketplace;
pub mod user;
