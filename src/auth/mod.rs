// src/auth/mod.rs
pub mod jwt;
