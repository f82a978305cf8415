pub mod fastbtc;
pub mod info;
pub mod params;
pub mod stats;
pub mod transactions;
