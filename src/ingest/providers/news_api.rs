// src/ingest/providers/news_api.rs
//! Headlines API (NewsAPI-compatible `top-headlines`).

use async_trait::async_trait;
use metrics::histogram;
use serde::Deserialize;

use crate::error::TrendError;
use crate::ingest::feed::parse_timestamp;
use crate::ingest::normalize_text;
use crate::ingest::transport::{Credential, Transport};
use crate::ingest::types::{FeedRecord, RawRecord, SourceKind, SourceProvider};

const PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
struct HeadlinesResponse {
    status: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Article {
    #[serde(default)]
    source: Option<ArticleSource>,
    title: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArticleSource {
    name: Option<String>,
}

pub struct NewsApiProvider {
    endpoint: String,
    sources: Vec<String>,
    api_key: Option<String>,
    transport: Transport,
}

impl NewsApiProvider {
    pub fn new(
        endpoint: String,
        sources: Vec<String>,
        api_key: Option<String>,
        transport: Transport,
    ) -> Self {
        Self {
            endpoint,
            sources,
            api_key,
            transport,
        }
    }

    fn parse_body(&self, body: &str) -> Result<Vec<RawRecord>, TrendError> {
        let resp: HeadlinesResponse = serde_json::from_str(body)
            .map_err(|e| TrendError::unavailable(self.name(), format!("decoding headlines: {e}")))?;

        if resp.status != "ok" {
            return match resp.code.as_deref() {
                Some("apiKeyInvalid" | "apiKeyMissing" | "apiKeyDisabled") => {
                    Err(TrendError::auth(self.name()))
                }
                _ => Err(TrendError::unavailable(
                    self.name(),
                    resp.message.unwrap_or_else(|| format!("status {}", resp.status)),
                )),
            };
        }

        Ok(resp
            .articles
            .into_iter()
            .map(|a| {
                RawRecord::Feed(FeedRecord {
                    title: a.title.map(|t| normalize_text(&t)),
                    link: a.url,
                    source: a.source.and_then(|s| s.name),
                    published: a.published_at.as_deref().and_then(parse_timestamp),
                    description: a.description.map(|d| normalize_text(&d)),
                    category: None,
                })
            })
            .collect())
    }
}

#[async_trait]
impl SourceProvider for NewsApiProvider {
    async fn fetch_raw(&self) -> Result<Vec<RawRecord>, TrendError> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(TrendError::auth(self.name()));
        };
        let t0 = std::time::Instant::now();
        let query = [
            ("sources", self.sources.join(",")),
            ("pageSize", PAGE_SIZE.to_string()),
        ];
        let body = self
            .transport
            .get_text(
                self.name(),
                &self.endpoint,
                &query,
                Credential::Header("X-Api-Key", key),
            )
            .await?;
        let out = self.parse_body(&body);
        histogram!("trends_fetch_ms", "source" => self.name())
            .record(t0.elapsed().as_secs_f64() * 1_000.0);
        out
    }

    fn name(&self) -> &'static str {
        "news"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::News
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENDPOINT: &str = "https://news.test/v2/top-headlines";

    fn provider(body: &str, key: Option<&str>) -> NewsApiProvider {
        NewsApiProvider::new(
            ENDPOINT.into(),
            vec!["wired".into()],
            key.map(str::to_string),
            Transport::fixtures([(ENDPOINT, body)]),
        )
    }

    #[tokio::test]
    async fn missing_key_is_an_authentication_error() {
        let err = provider("{}", None).fetch_raw().await.unwrap_err();
        assert!(matches!(err, TrendError::AuthenticationError { .. }));
    }

    #[tokio::test]
    async fn rejected_key_is_an_authentication_error() {
        let body = r#"{"status":"error","code":"apiKeyInvalid","message":"nope"}"#;
        let err = provider(body, Some("k")).fetch_raw().await.unwrap_err();
        assert!(matches!(err, TrendError::AuthenticationError { .. }));
    }

    #[tokio::test]
    async fn articles_become_feed_records() {
        let body = r#"{"status":"ok","totalResults":1,"articles":[
            {"source":{"id":"wired","name":"Wired"},"title":"Quantum chips arrive",
             "url":"https://wired.test/q","publishedAt":"2025-06-10T08:00:00Z",
             "description":"A <em>quantum</em> leap"}]}"#;
        let raw = provider(body, Some("k")).fetch_raw().await.unwrap();
        let RawRecord::Feed(rec) = &raw[0] else {
            panic!("expected feed record");
        };
        assert_eq!(rec.source.as_deref(), Some("Wired"));
        assert_eq!(rec.description.as_deref(), Some("A quantum leap"));
        assert!(rec.published.is_some());
    }
}
