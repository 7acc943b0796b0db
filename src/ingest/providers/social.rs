// src/ingest/providers/social.rs
//! Social post search (Twitter v2 compatible `tweets/search/recent`).

use async_trait::async_trait;
use metrics::histogram;
use serde::Deserialize;

use crate::error::TrendError;
use crate::ingest::feed::parse_timestamp;
use crate::ingest::transport::{Credential, Transport};
use crate::ingest::types::{RawRecord, SocialRecord, SourceKind, SourceProvider};

const MAX_RESULTS: u32 = 20;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct Post {
    id: String,
    text: String,
    created_at: Option<String>,
    #[serde(default)]
    public_metrics: Option<PublicMetrics>,
}

#[derive(Debug, Default, Deserialize)]
struct PublicMetrics {
    #[serde(default)]
    like_count: u64,
    #[serde(default)]
    retweet_count: u64,
}

pub struct SocialPostProvider {
    endpoint: String,
    query: String,
    bearer_token: Option<String>,
    transport: Transport,
}

impl SocialPostProvider {
    pub fn new(
        endpoint: String,
        query: String,
        bearer_token: Option<String>,
        transport: Transport,
    ) -> Self {
        Self {
            endpoint,
            query,
            bearer_token,
            transport,
        }
    }
}

#[async_trait]
impl SourceProvider for SocialPostProvider {
    async fn fetch_raw(&self) -> Result<Vec<RawRecord>, TrendError> {
        let Some(token) = self.bearer_token.as_deref() else {
            return Err(TrendError::auth(self.name()));
        };
        let t0 = std::time::Instant::now();
        let query = [
            ("query", self.query.clone()),
            ("tweet.fields", "public_metrics,created_at".to_string()),
            ("max_results", MAX_RESULTS.to_string()),
            ("sort_order", "relevancy".to_string()),
        ];
        let body = self
            .transport
            .get_text(self.name(), &self.endpoint, &query, Credential::Bearer(token))
            .await?;

        // An empty result set comes back without a `data` key.
        let resp: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| TrendError::unavailable(self.name(), format!("decoding posts: {e}")))?;

        histogram!("trends_fetch_ms", "source" => self.name())
            .record(t0.elapsed().as_secs_f64() * 1_000.0);

        Ok(resp
            .data
            .into_iter()
            .map(|p| {
                let m = p.public_metrics.unwrap_or_default();
                RawRecord::Social(SocialRecord {
                    id: Some(p.id),
                    text: Some(p.text),
                    created_at: p.created_at.as_deref().and_then(parse_timestamp),
                    likes: m.like_count,
                    reposts: m.retweet_count,
                })
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "social"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Social
    }
}
