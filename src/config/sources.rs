// src/config/sources.rs
//! Which upstreams each adapter talks to. Loaded from TOML or JSON, with
//! built-in defaults when no file is present.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_SOURCES_PATH: &str = "TRENDS_SOURCES_PATH";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedFeed {
    pub url: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Tech RSS/Atom feeds.
    pub rss_feeds: Vec<String>,
    /// An RSS article is kept only if title or description mentions one of these.
    pub tech_keywords: Vec<String>,
    /// Headline API endpoint and source ids.
    pub news_endpoint: String,
    pub news_sources: Vec<String>,
    /// Social-search feeds, each tagged with a category.
    pub social_feeds: Vec<CategorizedFeed>,
    /// Social post search endpoint and query.
    pub social_endpoint: String,
    pub social_query: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            rss_feeds: strings(&[
                "https://techcrunch.com/feed/",
                "https://feeds.feedburner.com/TheHackersNews",
                "https://hnrss.org/newest?points=100",
                "https://www.techmeme.com/feed.xml?x=1",
                "https://dev.to/feed/latest",
            ]),
            tech_keywords: strings(&[
                "latest",
                "new",
                "launch",
                "update",
                "release",
                "ai",
                "machine learning",
                "programming",
                "developer",
                "cloud",
                "data science",
                "cybersecurity",
                "blockchain",
                "startup",
                "funding",
                "tech industry",
                "innovation",
                "framework",
                "language",
                "tool",
                "platform",
            ]),
            news_endpoint: "https://newsapi.org/v2/top-headlines".to_string(),
            news_sources: strings(&[
                "techcrunch",
                "wired",
                "the-verge",
                "ars-technica",
                "hacker-news",
            ]),
            social_feeds: vec![
                feed("https://www.reddit.com/r/programming+learnprogramming+coding+webdev/.rss?sort=hot&t=day", "Development"),
                feed("https://www.reddit.com/r/technology+artificial+MachineLearning+ChatGPT/.rss?sort=hot&t=day", "Tech & AI"),
                feed("https://www.reddit.com/r/compsci+softwareengineering+cscareerquestions/.rss?sort=hot&t=day", "Computer Science"),
                feed("https://www.reddit.com/r/javascript+python+java+golang/.rss?sort=hot&t=day", "Programming Languages"),
                feed("https://www.reddit.com/r/tech+technews+TechNewsToday/.rss?sort=hot&t=day", "Tech News"),
                feed("https://www.reddit.com/search.rss?q=title%3A(AI+OR+Machine+Learning+OR+ChatGPT)&sort=hot&t=day", "AI Trends"),
                feed("https://www.reddit.com/search.rss?q=title%3A(Programming+OR+Coding+OR+Development)&sort=hot&t=day", "Dev Trends"),
            ],
            social_endpoint: "https://api.twitter.com/2/tweets/search/recent".to_string(),
            social_query: "(AI OR \"Artificial Intelligence\" OR Programming OR \"Software Development\" OR Tech) -is:retweet lang:en".to_string(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn feed(url: &str, category: &str) -> CategorizedFeed {
    CategorizedFeed {
        url: url.to_string(),
        category: category.to_string(),
    }
}

impl SourcesConfig {
    /// Load from an explicit path. Supports TOML or JSON, chosen by extension.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading sources config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg = match ext.as_str() {
            "json" => serde_json::from_str::<SourcesConfig>(&content)
                .with_context(|| format!("parsing {}", path.display()))?,
            _ => toml::from_str::<SourcesConfig>(&content)
                .with_context(|| format!("parsing {}", path.display()))?,
        };
        Ok(cfg.cleaned())
    }

    /// Resolution order:
    /// 1) $TRENDS_SOURCES_PATH
    /// 2) config/sources.toml
    /// 3) config/sources.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_SOURCES_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("{ENV_SOURCES_PATH} points to non-existent path"));
        }
        for candidate in ["config/sources.toml", "config/sources.json"] {
            let p = PathBuf::from(candidate);
            if p.exists() {
                return Self::load_from(&p);
            }
        }
        Ok(Self::default())
    }

    fn cleaned(mut self) -> Self {
        self.rss_feeds = clean_list(self.rss_feeds);
        self.news_sources = clean_list(self.news_sources);
        self.tech_keywords = self
            .tech_keywords
            .into_iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        self.social_feeds.retain(|f| !f.url.trim().is_empty());
        self
    }
}

// Trim, drop empties and repeats; keeps the configured order.
fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim();
        if !t.is_empty() && !out.iter().any(|o| o == t) {
            out.push(t.to_string());
        }
    }
    out
}
