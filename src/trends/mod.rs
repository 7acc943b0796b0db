// src/trends/mod.rs
pub mod aggregate;
pub mod filter;
pub mod rank;
pub mod views;

pub use aggregate::{aggregate, canonical_key, AggregatedTrend, Aggregation};
pub use filter::drop_low_value;
pub use rank::rank;
