// src/trends/views.rs
//! Per-endpoint response shapes and the small transformations behind them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ingest::types::TrendItem;
use crate::trends::aggregate::AggregatedTrend;

pub const RSS_ARTICLE_LIMIT: usize = 15;
pub const NEWS_LATEST_PER_CATEGORY: usize = 3;
pub const SOCIAL_SEARCH_POST_LIMIT: usize = 30;

/// `TrendItem` as served: adds a human "time ago" label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleView {
    pub title: String,
    pub link: String,
    pub source: String,
    pub published_date: DateTime<Utc>,
    pub time_ago: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ArticleView {
    pub fn from_item(item: TrendItem, now: DateTime<Utc>) -> Self {
        Self {
            time_ago: time_ago(item.published_date, now),
            title: item.title,
            link: item.link,
            source: item.source,
            published_date: item.published_date,
            description: item.description.filter(|d| !d.is_empty()),
            category: item.category,
        }
    }

    /// Back to a `TrendItem`. With `title_as_description`, an empty
    /// description is replaced by the title.
    pub fn to_item(&self, title_as_description: bool) -> TrendItem {
        let description = match &self.description {
            Some(d) if !d.is_empty() => Some(d.clone()),
            _ if title_as_description => Some(self.title.clone()),
            _ => None,
        };
        TrendItem {
            title: self.title.clone(),
            link: self.link.clone(),
            source: self.source.clone(),
            published_date: self.published_date,
            description,
            category: self.category.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RssResponse {
    pub success: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub articles: Vec<ArticleView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsCategory {
    pub category: String,
    pub trend_count: usize,
    pub latest_trends: Vec<ArticleView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub success: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub trends_count: usize,
    #[serde(default)]
    pub trends: Vec<NewsCategory>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialSearchResponse {
    pub success: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub post_count: usize,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub posts: Vec<ArticleView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Ranked trend list (`/trends/social`, `/trends/top`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<AggregatedTrend>,
}

impl RankedResponse {
    pub fn ok(data: Vec<AggregatedTrend>) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl RssResponse {
    pub fn ok(articles: Vec<ArticleView>, now: DateTime<Utc>) -> Self {
        Self {
            success: true,
            timestamp: now,
            articles,
            message: None,
            error: None,
        }
    }

    pub fn failed(error: impl ToString, now: DateTime<Utc>) -> Self {
        Self {
            success: false,
            timestamp: now,
            articles: Vec::new(),
            message: Some("Failed to fetch tech RSS feeds".to_string()),
            error: Some(error.to_string()),
        }
    }
}

impl NewsResponse {
    pub fn ok(trends: Vec<NewsCategory>, categories: Vec<String>, now: DateTime<Utc>) -> Self {
        Self {
            success: true,
            timestamp: now,
            trends_count: trends.len(),
            trends,
            categories,
            message: None,
            error: None,
        }
    }

    pub fn failed(error: impl ToString, now: DateTime<Utc>) -> Self {
        Self {
            success: false,
            timestamp: now,
            trends_count: 0,
            trends: Vec::new(),
            categories: Vec::new(),
            message: Some("Failed to fetch tech headlines".to_string()),
            error: Some(error.to_string()),
        }
    }
}

impl SocialSearchResponse {
    pub fn ok(posts: Vec<ArticleView>, now: DateTime<Utc>) -> Self {
        let mut categories: Vec<String> = Vec::new();
        for c in posts.iter().filter_map(|p| p.category.as_ref()) {
            if !categories.contains(c) {
                categories.push(c.clone());
            }
        }
        Self {
            success: true,
            timestamp: now,
            post_count: posts.len(),
            categories,
            posts,
            message: None,
            error: None,
        }
    }

    pub fn failed(error: impl ToString, now: DateTime<Utc>) -> Self {
        Self {
            success: false,
            timestamp: now,
            post_count: 0,
            categories: Vec::new(),
            posts: Vec::new(),
            message: Some("Failed to fetch social search trends".to_string()),
            error: Some(error.to_string()),
        }
    }
}

/// Keyword-matched tech articles, newest first, at most `RSS_ARTICLE_LIMIT`.
pub fn rss_articles(items: Vec<TrendItem>, keywords: &[String], now: DateTime<Utc>) -> Vec<ArticleView> {
    let mut kept: Vec<TrendItem> = items
        .into_iter()
        .filter(|it| {
            let title = it.title.to_lowercase();
            let desc = it.description.as_deref().unwrap_or_default().to_lowercase();
            keywords
                .iter()
                .any(|k| title.contains(k.as_str()) || desc.contains(k.as_str()))
        })
        .collect();
    kept.sort_by(|a, b| b.published_date.cmp(&a.published_date));
    kept.truncate(RSS_ARTICLE_LIMIT);
    kept.into_iter().map(|it| ArticleView::from_item(it, now)).collect()
}

const NEWS_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "AI & ML",
        &["ai", "machine learning", "chatgpt", "artificial intelligence", "deep learning", "openai"],
    ),
    (
        "Programming",
        &["programming", "developer", "javascript", "python", "coding", "software"],
    ),
    (
        "Cloud & DevOps",
        &["cloud", "aws", "azure", "devops", "kubernetes", "docker"],
    ),
    (
        "Cybersecurity",
        &["security", "cyber", "hack", "vulnerability", "privacy", "encryption"],
    ),
    (
        "Emerging Tech",
        &["blockchain", "web3", "metaverse", "quantum", "5g", "iot"],
    ),
];

/// Group headlines by keyword category. An article lands in every category it
/// matches. Categories are listed in the order they first received an article,
/// the grouped trends by article count (highest first).
pub fn news_categories(items: Vec<TrendItem>, now: DateTime<Utc>) -> (Vec<NewsCategory>, Vec<String>) {
    let mut grouped: indexmap::IndexMap<&'static str, Vec<TrendItem>> = indexmap::IndexMap::new();
    for it in items {
        let text = format!(
            "{} {}",
            it.title,
            it.description.as_deref().unwrap_or_default()
        )
        .to_lowercase();
        for (category, keywords) in NEWS_CATEGORIES {
            if keywords.iter().any(|k| text.contains(k)) {
                grouped.entry(*category).or_default().push(it.clone());
            }
        }
    }

    let categories: Vec<String> = grouped.keys().map(|c| c.to_string()).collect();
    let mut trends: Vec<NewsCategory> = grouped
        .into_iter()
        .map(|(category, mut articles)| {
            let trend_count = articles.len();
            articles.sort_by(|a, b| b.published_date.cmp(&a.published_date));
            articles.truncate(NEWS_LATEST_PER_CATEGORY);
            NewsCategory {
                category: category.to_string(),
                trend_count,
                latest_trends: articles
                    .into_iter()
                    .map(|a| ArticleView::from_item(a, now))
                    .collect(),
            }
        })
        .collect();
    trends.sort_by(|a, b| b.trend_count.cmp(&a.trend_count));
    (trends, categories)
}

/// Exact-title dedup (first kept), newest first, at most `SOCIAL_SEARCH_POST_LIMIT`.
pub fn social_search_posts(items: Vec<TrendItem>, now: DateTime<Utc>) -> Vec<ArticleView> {
    let mut seen = std::collections::HashSet::new();
    let mut unique: Vec<TrendItem> = items
        .into_iter()
        .filter(|it| seen.insert(it.title.clone()))
        .collect();
    unique.sort_by(|a, b| b.published_date.cmp(&a.published_date));
    unique.truncate(SOCIAL_SEARCH_POST_LIMIT);
    unique
        .into_iter()
        .map(|it| ArticleView::from_item(it, now))
        .collect()
}

/// "3 hours ago", "1 day ago", ... or "Just now" under a minute.
pub fn time_ago(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    const UNITS: &[(&str, i64)] = &[
        ("year", 31_536_000),
        ("month", 2_592_000),
        ("week", 604_800),
        ("day", 86_400),
        ("hour", 3_600),
        ("minute", 60),
    ];
    let seconds = (now - date).num_seconds();
    for (unit, secs) in UNITS {
        let n = seconds / secs;
        if n >= 1 {
            return format!("{n} {unit}{} ago", if n == 1 { "" } else { "s" });
        }
    }
    "Just now".to_string()
}
