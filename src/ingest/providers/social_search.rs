// src/ingest/providers/social_search.rs
//! Community feeds (Reddit-style RSS/Atom), each tagged with a category.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use crate::config::CategorizedFeed;
use crate::error::TrendError;
use crate::ingest::providers::{fetch_feeds, FeedTarget};
use crate::ingest::rate_limit::RateLimiter;
use crate::ingest::transport::Transport;
use crate::ingest::types::{RawRecord, SourceKind, SourceProvider};

pub const SOCIAL_SEARCH_SOURCE: &str = "Reddit";

static RE_SCORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\d+\]\s*").expect("score regex"));

/// Remove the first `[123]` vote-count marker some feeds put into titles.
pub fn strip_score_marker(title: &str) -> String {
    RE_SCORE.replacen(title, 1, "").trim().to_string()
}

pub struct SocialSearchProvider {
    feeds: Vec<CategorizedFeed>,
    transport: Transport,
    limiter: Arc<RateLimiter>,
}

impl SocialSearchProvider {
    pub fn new(
        feeds: Vec<CategorizedFeed>,
        transport: Transport,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            feeds,
            transport,
            limiter,
        }
    }
}

#[async_trait]
impl SourceProvider for SocialSearchProvider {
    async fn fetch_raw(&self) -> Result<Vec<RawRecord>, TrendError> {
        let targets: Vec<FeedTarget<'_>> = self
            .feeds
            .iter()
            .map(|f| FeedTarget {
                url: &f.url,
                category: Some(&f.category),
            })
            .collect();
        let records = fetch_feeds(self.name(), &self.transport, &self.limiter, &targets).await?;
        Ok(records
            .into_iter()
            .map(|mut rec| {
                rec.title = rec.title.map(|t| strip_score_marker(&t));
                rec.source = Some(SOCIAL_SEARCH_SOURCE.to_string());
                RawRecord::Feed(rec)
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "social-search"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::SocialSearch
    }
}
