// src/ingest/providers/mod.rs
pub mod news_api;
pub mod social;
pub mod social_search;
pub mod tech_rss;

use metrics::{counter, histogram};

use crate::error::TrendError;
use crate::ingest::feed::parse_feed;
use crate::ingest::rate_limit::RateLimiter;
use crate::ingest::transport::{Credential, Transport};
use crate::ingest::types::FeedRecord;

/// One feed URL and the category its records get tagged with, if any.
#[derive(Debug, Clone)]
pub(crate) struct FeedTarget<'a> {
    pub url: &'a str,
    pub category: Option<&'a str>,
}

/// Walk `targets` one at a time through `limiter`. A failing feed is logged and
/// skipped; the call only fails when every feed failed.
pub(crate) async fn fetch_feeds(
    provider: &'static str,
    transport: &Transport,
    limiter: &RateLimiter,
    targets: &[FeedTarget<'_>],
) -> Result<Vec<FeedRecord>, TrendError> {
    let t0 = std::time::Instant::now();
    let mut out = Vec::new();
    let mut failures = 0usize;
    let mut last_err = None;

    for target in targets {
        limiter.acquire().await;
        let parsed = match transport
            .get_text(provider, target.url, &[], Credential::None)
            .await
        {
            Ok(body) => parse_feed(&body)
                .map_err(|e| TrendError::unavailable(provider, format!("{e:#}"))),
            Err(e) => Err(e),
        };

        match parsed {
            Ok(feed) => {
                tracing::debug!(provider, url = target.url, items = feed.records.len(), "feed fetched");
                out.extend(feed.records.into_iter().map(|mut rec| {
                    if let Some(cat) = target.category {
                        rec.category = Some(cat.to_string());
                    }
                    rec
                }));
            }
            Err(e) => {
                tracing::warn!(provider, url = target.url, error = %e, "feed fetch failed");
                counter!("trends_feed_errors_total", "source" => provider).increment(1);
                failures += 1;
                last_err = Some(e);
            }
        }
    }

    histogram!("trends_fetch_ms", "source" => provider).record(t0.elapsed().as_secs_f64() * 1_000.0);

    if !targets.is_empty() && failures == targets.len() {
        return Err(last_err.unwrap_or_else(|| TrendError::unavailable(provider, "all feeds failed")));
    }
    Ok(out)
}
