// src/config/settings.rs
//! Process-level settings read from the environment (after `.env` is loaded).

use std::path::PathBuf;
use std::time::Duration;

use crate::ingest::rate_limit::DEFAULT_FEED_DELAY_MS;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATA_PATH: &str = "data/trends.json";
pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub port: u16,
    pub data_path: PathBuf,
    pub feed_delay_ms: u64,
    pub http_timeout: Duration,
    /// Background fetch-and-store period; `None` disables the refresher.
    pub refresh_every: Option<Duration>,
    pub top_n: usize,
    pub news_api_key: Option<String>,
    pub social_bearer_token: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            feed_delay_ms: DEFAULT_FEED_DELAY_MS,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            refresh_every: None,
            top_n: DEFAULT_TOP_N,
            news_api_key: None,
            social_bearer_token: None,
        }
    }
}

impl AppSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as `from_env` over an arbitrary key lookup. Unparsable values fall back to defaults.
    pub fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let secret = |k: &str| get(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            port: parse(get("PORT")).unwrap_or(d.port),
            data_path: get("TRENDS_DATA_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(d.data_path),
            feed_delay_ms: parse(get("TRENDS_FEED_DELAY_MS")).unwrap_or(d.feed_delay_ms),
            http_timeout: parse(get("TRENDS_HTTP_TIMEOUT_SECS"))
                .filter(|s: &u64| *s > 0)
                .map(Duration::from_secs)
                .unwrap_or(d.http_timeout),
            refresh_every: parse(get("TRENDS_REFRESH_SECS"))
                .filter(|s: &u64| *s > 0)
                .map(Duration::from_secs),
            top_n: parse(get("TRENDS_TOP_N"))
                .filter(|n: &usize| *n > 0)
                .unwrap_or(d.top_n),
            news_api_key: secret("NEWS_API_KEY"),
            social_bearer_token: secret("SOCIAL_BEARER_TOKEN")
                .or_else(|| secret("TWITTER_BEARER_TOKEN")),
        }
    }
}

fn parse<T: std::str::FromStr>(raw: Option<String>) -> Option<T> {
    raw.and_then(|s| s.trim().parse::<T>().ok())
}
