// src/trends/aggregate.rs
//! Groups near-duplicate titles under a canonical key and counts occurrences.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ingest::types::TrendItem;

/// Canonical dedup key: lowercase, every non-word character becomes a
/// separator, whitespace runs fold to one space, ends trimmed.
///
/// "GPT-5 Launches!" and "gpt 5 launches" both map to "gpt 5 launches".
pub fn canonical_key(title: &str) -> String {
    let lowered = title.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;
    for ch in lowered.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        } else {
            pending_space = true;
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedTrend {
    pub key: String,
    pub count: usize,
    /// First-seen original title.
    pub title: String,
    /// One entry per contributing item, in encounter order; repeats allowed.
    #[serde(rename = "source")]
    pub sources: Vec<String>,
    #[serde(rename = "url")]
    pub urls: Vec<String>,
    pub description: String,
}

impl AggregatedTrend {
    pub fn from_item(key: String, item: &TrendItem) -> Self {
        Self {
            key,
            count: 1,
            title: item.title.clone(),
            sources: vec![item.source.clone()],
            urls: vec![item.link.clone()],
            description: item.description.clone().unwrap_or_default(),
        }
    }

    /// Fold another occurrence of the same trend in. Lists are concatenated
    /// element by element; title and description stay those of the first occurrence.
    pub fn merge(&mut self, other: AggregatedTrend) {
        self.count += other.count;
        self.sources.extend(other.sources);
        self.urls.extend(other.urls);
    }
}

/// Key → trend map that remembers first-insertion order.
#[derive(Debug, Default, Clone)]
pub struct Aggregation {
    groups: IndexMap<String, AggregatedTrend>,
}

impl Aggregation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Titles that canonicalize to an empty key are ignored.
    pub fn push_item(&mut self, item: &TrendItem) {
        let key = canonical_key(&item.title);
        if key.is_empty() {
            return;
        }
        match self.groups.get_mut(&key) {
            Some(existing) => {
                existing.count += 1;
                existing.sources.push(item.source.clone());
                existing.urls.push(item.link.clone());
            }
            None => {
                let trend = AggregatedTrend::from_item(key.clone(), item);
                self.groups.insert(key, trend);
            }
        }
    }

    /// Merge an already aggregated trend, re-keying it from its title.
    pub fn push_trend(&mut self, mut trend: AggregatedTrend) {
        let key = canonical_key(&trend.title);
        if key.is_empty() {
            return;
        }
        match self.groups.get_mut(&key) {
            Some(existing) => existing.merge(trend),
            None => {
                trend.key = key.clone();
                self.groups.insert(key, trend);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&AggregatedTrend> {
        self.groups.get(key)
    }

    /// Trends in first-insertion order.
    pub fn into_trends(self) -> Vec<AggregatedTrend> {
        self.groups.into_values().collect()
    }
}

/// Aggregate a sequence of items in one go.
pub fn aggregate<'a, I>(items: I) -> Aggregation
where
    I: IntoIterator<Item = &'a TrendItem>,
{
    let mut agg = Aggregation::new();
    for item in items {
        agg.push_item(item);
    }
    agg
}
