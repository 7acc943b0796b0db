// src/ingest/types.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TrendError;

/// Normalized news item, the common shape every adapter's output is mapped into.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrendItem {
    pub title: String,
    pub link: String,
    pub source: String,
    pub published_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Which family of adapter a record came from; decides the normalization rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    Rss,
    News,
    SocialSearch,
    Social,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Rss => "rss",
            SourceKind::News => "news",
            SourceKind::SocialSearch => "social-search",
            SourceKind::Social => "social",
        }
    }
}

/// Article-like record from a feed or a headlines API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedRecord {
    pub title: Option<String>,
    pub link: Option<String>,
    pub source: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// Post from the social search adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialRecord {
    pub id: Option<String>,
    pub text: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub likes: u64,
    pub reposts: u64,
}

impl SocialRecord {
    pub fn engagement(&self) -> u64 {
        self.likes.saturating_add(self.reposts)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawRecord {
    Feed(FeedRecord),
    Social(SocialRecord),
}

#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    /// Fetch the provider's current records. A failure means the whole source is out.
    async fn fetch_raw(&self) -> Result<Vec<RawRecord>, TrendError>;
    fn name(&self) -> &'static str;
    fn kind(&self) -> SourceKind;
}
