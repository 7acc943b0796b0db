// src/ingest/providers/tech_rss.rs
use async_trait::async_trait;
use std::sync::Arc;

use crate::error::TrendError;
use crate::ingest::providers::{fetch_feeds, FeedTarget};
use crate::ingest::rate_limit::RateLimiter;
use crate::ingest::transport::Transport;
use crate::ingest::types::{RawRecord, SourceKind, SourceProvider};

/// Tech news RSS/Atom feeds, fetched one after another.
pub struct TechRssProvider {
    feeds: Vec<String>,
    transport: Transport,
    limiter: Arc<RateLimiter>,
}

impl TechRssProvider {
    pub fn new(feeds: Vec<String>, transport: Transport, limiter: Arc<RateLimiter>) -> Self {
        Self {
            feeds,
            transport,
            limiter,
        }
    }
}

#[async_trait]
impl SourceProvider for TechRssProvider {
    async fn fetch_raw(&self) -> Result<Vec<RawRecord>, TrendError> {
        let targets: Vec<FeedTarget<'_>> = self
            .feeds
            .iter()
            .map(|url| FeedTarget {
                url,
                category: None,
            })
            .collect();
        let records = fetch_feeds(self.name(), &self.transport, &self.limiter, &targets).await?;
        Ok(records.into_iter().map(RawRecord::Feed).collect())
    }

    fn name(&self) -> &'static str {
        "rss"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Rss
    }
}
