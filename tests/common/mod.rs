// tests/common/mod.rs
//
// Shared wiring for integration tests: fixture loading with relative dates,
// a sources config pointing at fixture URLs, and router state construction.
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;

use tech_trends::api::AppState;
use tech_trends::config::{AppSettings, CategorizedFeed, SourcesConfig};
use tech_trends::ingest::transport::Transport;
use tech_trends::pipeline::SourceSet;
use tech_trends::store::TrendStore;
use tech_trends::summarize::{MockProvider, Summarizer};

pub const RSS_TECH: &str = "https://techdaily.test/feed.xml";
pub const RSS_DEV: &str = "https://devweekly.test/atom.xml";
pub const REDDIT_PROGRAMMING: &str = "https://reddit.test/r/programming/.rss";
pub const REDDIT_ML: &str = "https://reddit.test/r/MachineLearning/.rss";
pub const NEWS_URL: &str = "https://news.test/v2/top-headlines";
pub const SOCIAL_URL: &str = "https://social.test/2/tweets/search/recent";

pub const BODY_LIMIT: usize = 1024 * 1024;

/// Replace `{{ago:N}}` (RFC 2822) and `{{iso:N}}` (RFC 3339) with `now - N hours`.
pub fn render(template: &str, now: DateTime<Utc>) -> String {
    let re = Regex::new(r"\{\{(ago|iso):(\d+)\}\}").unwrap();
    re.replace_all(template, |caps: &regex::Captures| {
        let hours: i64 = caps[2].parse().unwrap();
        let at = now - Duration::hours(hours);
        if &caps[1] == "ago" {
            at.to_rfc2822()
        } else {
            at.to_rfc3339()
        }
    })
    .into_owned()
}

pub fn fixture(name: &str, now: DateTime<Utc>) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    let raw = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("reading {}: {e}", path.display()));
    render(&raw, now)
}

pub fn test_sources() -> SourcesConfig {
    SourcesConfig {
        rss_feeds: vec![RSS_TECH.to_string(), RSS_DEV.to_string()],
        tech_keywords: vec!["ai".into(), "cloud".into(), "rust".into()],
        news_endpoint: NEWS_URL.to_string(),
        news_sources: vec!["the-verge".into(), "wired".into()],
        social_feeds: vec![
            CategorizedFeed {
                url: REDDIT_PROGRAMMING.to_string(),
                category: "Programming".into(),
            },
            CategorizedFeed {
                url: REDDIT_ML.to_string(),
                category: "Machine Learning".into(),
            },
        ],
        social_endpoint: SOCIAL_URL.to_string(),
        social_query: "tech".into(),
    }
}

pub fn test_settings(data_path: &Path) -> AppSettings {
    AppSettings {
        data_path: data_path.to_path_buf(),
        feed_delay_ms: 0,
        news_api_key: Some("test-news-key".into()),
        social_bearer_token: Some("test-bearer".into()),
        ..AppSettings::default()
    }
}

/// Every fixture URL → rendered body, minus the ones listed in `skip`
/// (a missing route behaves like a network failure).
pub fn transport_without(skip: &[&str], now: DateTime<Utc>) -> Transport {
    let all = [
        (RSS_TECH, "tech_rss.xml"),
        (RSS_DEV, "dev_atom.xml"),
        (REDDIT_PROGRAMMING, "reddit_programming.xml"),
        (REDDIT_ML, "reddit_ml.xml"),
        (NEWS_URL, "headlines.json"),
        (SOCIAL_URL, "social_posts.json"),
    ];
    Transport::fixtures(
        all.into_iter()
            .filter(|(url, _)| !skip.contains(url))
            .map(|(url, file)| (url.to_string(), fixture(file, now))),
    )
}

pub fn full_transport(now: DateTime<Utc>) -> Transport {
    transport_without(&[], now)
}

pub fn source_set(settings: &AppSettings, transport: Transport) -> SourceSet {
    SourceSet::build(settings, &test_sources(), transport)
}

pub fn app_state(settings: &AppSettings, transport: Transport, summarizer: Summarizer) -> AppState {
    AppState::new(
        source_set(settings, transport),
        TrendStore::new(settings.data_path.clone()),
        summarizer,
        settings.top_n,
    )
}

pub fn mock_summarizer() -> Summarizer {
    Summarizer::new(Arc::new(MockProvider::default()))
}
