// src/pipeline.rs
//! Orchestration: live endpoint views, fetch-and-store, ranking and summarizing the snapshot.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics::gauge;

use crate::config::{AppSettings, SourcesConfig};
use crate::error::TrendError;
use crate::ingest::freshness::{freshness_window, retain_fresh};
use crate::ingest::providers::{
    news_api::NewsApiProvider, social::SocialPostProvider, social_search::SocialSearchProvider,
    tech_rss::TechRssProvider,
};
use crate::ingest::rate_limit::RateLimiter;
use crate::ingest::transport::Transport;
use crate::ingest::types::{SourceProvider, TrendItem};
use crate::ingest::{collect_source, ensure_metrics_described};
use crate::store::{CombinedSnapshot, TrendStore};
use crate::summarize::{SummarizedTrend, Summarizer};
use crate::trends::views::{
    news_categories, rss_articles, social_search_posts, NewsResponse, RssResponse,
    SocialSearchResponse,
};
use crate::trends::{aggregate, drop_low_value, rank, AggregatedTrend};

/// The four adapters plus the keyword list the RSS view filters on.
/// Built once in the composition root and shared through `AppState`.
#[derive(Clone)]
pub struct SourceSet {
    pub rss: Arc<dyn SourceProvider>,
    pub news: Arc<dyn SourceProvider>,
    pub social_search: Arc<dyn SourceProvider>,
    pub social: Arc<dyn SourceProvider>,
    pub tech_keywords: Arc<Vec<String>>,
}

impl SourceSet {
    /// Wire every adapter to the same transport. Each multi-feed adapter gets
    /// its own limiter, so RSS and social-search pacing are independent.
    pub fn build(settings: &AppSettings, sources: &SourcesConfig, transport: Transport) -> Self {
        let rss_limiter = Arc::new(RateLimiter::from_millis(settings.feed_delay_ms, "rss"));
        let social_limiter = Arc::new(RateLimiter::from_millis(
            settings.feed_delay_ms,
            "social-search",
        ));

        Self {
            rss: Arc::new(TechRssProvider::new(
                sources.rss_feeds.clone(),
                transport.clone(),
                rss_limiter,
            )),
            news: Arc::new(NewsApiProvider::new(
                sources.news_endpoint.clone(),
                sources.news_sources.clone(),
                settings.news_api_key.clone(),
                transport.clone(),
            )),
            social_search: Arc::new(SocialSearchProvider::new(
                sources.social_feeds.clone(),
                transport.clone(),
                social_limiter,
            )),
            social: Arc::new(SocialPostProvider::new(
                sources.social_endpoint.clone(),
                sources.social_query.clone(),
                settings.social_bearer_token.clone(),
                transport,
            )),
            tech_keywords: Arc::new(sources.tech_keywords.clone()),
        }
    }
}

pub async fn rss_view(sources: &SourceSet, now: DateTime<Utc>) -> Result<RssResponse, TrendError> {
    let items = collect_source(sources.rss.as_ref(), now).await?;
    Ok(RssResponse::ok(
        rss_articles(items, &sources.tech_keywords, now),
        now,
    ))
}

pub async fn news_view(sources: &SourceSet, now: DateTime<Utc>) -> Result<NewsResponse, TrendError> {
    let items = collect_source(sources.news.as_ref(), now).await?;
    let (trends, categories) = news_categories(items, now);
    Ok(NewsResponse::ok(trends, categories, now))
}

pub async fn social_search_view(
    sources: &SourceSet,
    now: DateTime<Utc>,
) -> Result<SocialSearchResponse, TrendError> {
    let items = collect_source(sources.social_search.as_ref(), now).await?;
    Ok(SocialSearchResponse::ok(social_search_posts(items, now), now))
}

/// Live social posts, aggregated and ranked.
pub async fn social_trends(
    sources: &SourceSet,
    now: DateTime<Utc>,
    top_n: usize,
) -> Result<Vec<AggregatedTrend>, TrendError> {
    let items = collect_source(sources.social.as_ref(), now).await?;
    Ok(rank(aggregate(&items), top_n))
}

/// Fetch the three stored sources concurrently and overwrite the snapshot.
/// A failed source is stored as its failure envelope; if all three fail
/// nothing is written.
pub async fn fetch_and_store(
    sources: &SourceSet,
    store: &TrendStore,
    now: DateTime<Utc>,
) -> Result<CombinedSnapshot, TrendError> {
    ensure_metrics_described();
    let (rss, news, social) = tokio::join!(
        rss_view(sources, now),
        news_view(sources, now),
        social_search_view(sources, now),
    );

    if rss.is_err() && news.is_err() && social.is_err() {
        tracing::warn!("fetch-and-store: every source failed, snapshot left untouched");
        return Err(TrendError::NoSourcesSucceeded);
    }

    let snapshot = CombinedSnapshot {
        rss: rss.unwrap_or_else(|e| RssResponse::failed(e, now)),
        news: news.unwrap_or_else(|e| NewsResponse::failed(e, now)),
        social: social.unwrap_or_else(|e| SocialSearchResponse::failed(e, now)),
    };
    store.save(&snapshot).await?;
    gauge!("trends_last_store_ts").set(now.timestamp() as f64);

    tracing::info!(
        path = %store.path().display(),
        rss = snapshot.rss.articles.len(),
        news = snapshot.news.trends_count,
        social = snapshot.social.post_count,
        "snapshot stored"
    );
    Ok(snapshot)
}

/// Every item in a snapshot. RSS articles and social-search posts without a
/// description use their title; headline articles keep their own description.
pub fn snapshot_items(snapshot: &CombinedSnapshot) -> Vec<TrendItem> {
    let rss = snapshot.rss.articles.iter().map(|a| a.to_item(true));
    let news = snapshot
        .news
        .trends
        .iter()
        .flat_map(|c| c.latest_trends.iter())
        .map(|a| a.to_item(false));
    let social = snapshot.social.posts.iter().map(|a| a.to_item(true));
    rss.chain(news).chain(social).collect()
}

/// Denylist, freshness window, aggregation and top-N over a stored snapshot.
pub fn ranked_from_snapshot(
    snapshot: &CombinedSnapshot,
    now: DateTime<Utc>,
    top_n: usize,
) -> Vec<AggregatedTrend> {
    let items = drop_low_value(snapshot_items(snapshot));
    let (fresh, stale) = retain_fresh(items, now, freshness_window());
    if stale > 0 {
        tracing::debug!(stale, "stored items outside the freshness window");
    }
    rank(aggregate(&fresh), top_n)
}

pub async fn summarize_stored(
    store: &TrendStore,
    summarizer: &Summarizer,
    now: DateTime<Utc>,
    top_n: usize,
) -> Result<Vec<SummarizedTrend>, TrendError> {
    let snapshot = store.load().await?;
    let ranked = ranked_from_snapshot(&snapshot, now, top_n);
    tracing::info!(
        trends = ranked.len(),
        provider = summarizer.provider_name(),
        "summarizing stored trends"
    );
    summarizer.summarize(&ranked).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trends::views::ArticleView;
    use chrono::Duration;

    fn article(title: &str, desc: Option<&str>, hours_ago: i64, now: DateTime<Utc>) -> ArticleView {
        ArticleView {
            title: title.into(),
            link: format!("https://x.test/{}", title.replace(' ', "-")),
            source: "src".into(),
            published_date: now - Duration::hours(hours_ago),
            time_ago: String::new(),
            description: desc.map(str::to_string),
            category: None,
        }
    }

    fn snapshot(now: DateTime<Utc>) -> CombinedSnapshot {
        let mut news = NewsResponse::ok(vec![], vec![], now);
        news.trends.push(crate::trends::views::NewsCategory {
            category: "AI & ML".into(),
            trend_count: 1,
            latest_trends: vec![article("New AI tool!", Some("headline desc"), 2, now)],
        });
        CombinedSnapshot {
            rss: RssResponse::ok(
                vec![
                    article("New AI Tool", None, 1, now),
                    article("Rust basics", Some("A basic tutorial"), 1, now),
                    article("Ancient news", None, 40, now),
                ],
                now,
            ),
            news,
            social: SocialSearchResponse::ok(vec![article("Cloud Update", None, 3, now)], now),
        }
    }

    #[test]
    fn flatten_applies_description_fallbacks() {
        let now = Utc::now();
        let items = snapshot_items(&snapshot(now));
        assert_eq!(items.len(), 5);
        assert_eq!(items[0].description.as_deref(), Some("New AI Tool"));
        assert_eq!(items[3].description.as_deref(), Some("headline desc"));
        assert_eq!(items[4].description.as_deref(), Some("Cloud Update"));
    }

    #[test]
    fn ranking_drops_low_value_and_stale_items() {
        let now = Utc::now();
        let ranked = ranked_from_snapshot(&snapshot(now), now, 10);
        let titles: Vec<&str> = ranked.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["New AI Tool", "Cloud Update"]);
        assert_eq!(ranked[0].count, 2);
        assert_eq!(ranked[0].description, "New AI Tool");
    }
}
