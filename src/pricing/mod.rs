// src/pricing/mod.rs
//
// Pure computation core: volumetric weight classing and the closed-form
// sale-price solver. Nothing in here touches the database.
pub mod desi;
pub mod solver;
