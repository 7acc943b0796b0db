// src/trends/rank.rs
use crate::trends::aggregate::{AggregatedTrend, Aggregation};

/// Sort by occurrence count, highest first, and keep the top `n`.
/// The sort is stable, so equal counts stay in first-insertion order.
pub fn rank(aggregation: Aggregation, n: usize) -> Vec<AggregatedTrend> {
    let mut trends = aggregation.into_trends();
    trends.sort_by(|a, b| b.count.cmp(&a.count));
    trends.truncate(n);
    trends
}
