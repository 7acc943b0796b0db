// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod config;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod pipeline;
pub mod store;
pub mod summarize;
pub mod trends;

pub use crate::api::{router, AppState};
pub use crate::error::TrendError;
pub use crate::ingest::types::{SourceKind, SourceProvider, TrendItem};
pub use crate::trends::{canonical_key, AggregatedTrend};
