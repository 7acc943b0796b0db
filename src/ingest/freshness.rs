// src/ingest/freshness.rs
use chrono::{DateTime, Duration, Utc};

use crate::ingest::types::TrendItem;

/// Recency cutoff applied to every source right after fetch.
pub const FRESHNESS_WINDOW_HOURS: i64 = 24;

pub fn freshness_window() -> Duration {
    Duration::hours(FRESHNESS_WINDOW_HOURS)
}

/// Keep items strictly newer than `now - window`. Returns (kept, dropped count).
pub fn retain_fresh(
    items: Vec<TrendItem>,
    now: DateTime<Utc>,
    window: Duration,
) -> (Vec<TrendItem>, usize) {
    let cutoff = now - window;
    let before = items.len();
    let kept: Vec<TrendItem> = items
        .into_iter()
        .filter(|it| it.published_date > cutoff)
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}
