// src/ingest/normalize.rs
//! Maps each adapter's raw record shape onto `TrendItem`.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::ingest::types::{FeedRecord, RawRecord, SocialRecord, SourceKind, TrendItem};

/// `source` value for every social post.
pub const SOCIAL_SOURCE: &str = "social";

const PERMALINK_BASE: &str = "https://twitter.com/i/web/status/";

static RE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:https?|ftp)://\S+").expect("url regex"));
static RE_MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"@\w+").expect("mention regex"));
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("ws regex"));

/// Strip URLs, @-mentions and `#`, fold newlines and whitespace runs into single spaces.
pub fn clean_social_text(text: &str) -> String {
    let out = RE_URL.replace_all(text, "");
    let out = RE_MENTION.replace_all(&out, "");
    let out = out.replace('#', "");
    RE_WS.replace_all(&out, " ").trim().to_string()
}

/// Produce a `TrendItem`, or `None` when the title or link is missing.
///
/// A missing or unparsable date becomes the Unix epoch, which the freshness
/// filter then drops.
pub fn normalize(record: RawRecord, kind: SourceKind) -> Option<TrendItem> {
    match record {
        RawRecord::Feed(feed) => normalize_feed(feed, kind),
        RawRecord::Social(post) => normalize_social(post),
    }
}

fn normalize_feed(rec: FeedRecord, kind: SourceKind) -> Option<TrendItem> {
    let title = rec.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())?;
    let link = rec.link.filter(|l| !l.trim().is_empty())?;
    Some(TrendItem {
        title,
        link,
        source: rec
            .source
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| fallback_source(kind).to_string()),
        published_date: rec.published.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        description: Some(rec.description.unwrap_or_default()),
        category: rec.category,
    })
}

fn fallback_source(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::SocialSearch => "Reddit",
        SourceKind::Social => SOCIAL_SOURCE,
        SourceKind::Rss | SourceKind::News => "Unknown",
    }
}

fn normalize_social(post: SocialRecord) -> Option<TrendItem> {
    let title = clean_social_text(post.text.as_deref().unwrap_or_default());
    if title.is_empty() {
        return None;
    }
    let id = post.id.filter(|i| !i.is_empty())?;
    let category = Some(categorize_post(&title).to_string());
    Some(TrendItem {
        title,
        link: format!("{PERMALINK_BASE}{id}"),
        source: SOCIAL_SOURCE.to_string(),
        published_date: post.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        description: None,
        category,
    })
}

const POST_TOPICS: &[(&str, &[&str])] = &[
    (
        "AI/ML",
        &["ai", "artificial intelligence", "machine learning", "chatgpt", "openai"],
    ),
    ("Web/Mobile", &["web", "app", "mobile", "frontend", "backend"]),
    ("Programming", &["code", "programming", "developer", "software"]),
    ("Tech News", &["launch", "announced", "released", "update"]),
    (
        "Tech Companies",
        &["google", "apple", "microsoft", "meta", "amazon"],
    ),
];

/// First topic whose keyword occurs in the text (substring match), else "General Tech".
pub fn categorize_post(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    POST_TOPICS
        .iter()
        .find(|(_, kws)| kws.iter().any(|k| lower.contains(k)))
        .map(|(name, _)| *name)
        .unwrap_or("General Tech")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn social_text_is_cleaned() {
        let s = "Big #Rust news from @ferris:\nhttps://t.co/abc  read it";
        assert_eq!(clean_social_text(s), "Big Rust news from : read it");
    }

    #[test]
    fn feed_record_without_title_or_link_is_skipped() {
        let no_title = FeedRecord {
            link: Some("https://x.test".into()),
            ..Default::default()
        };
        assert!(normalize(RawRecord::Feed(no_title), SourceKind::Rss).is_none());

        let no_link = FeedRecord {
            title: Some("Hello".into()),
            ..Default::default()
        };
        assert!(normalize(RawRecord::Feed(no_link), SourceKind::Rss).is_none());
    }

    #[test]
    fn feed_record_maps_fields() {
        let ts = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
        let rec = FeedRecord {
            title: Some(" Cloud Update ".into()),
            link: Some("https://x.test/1".into()),
            source: None,
            published: Some(ts),
            description: None,
            category: Some("Dev".into()),
        };
        let item = normalize(RawRecord::Feed(rec), SourceKind::Rss).unwrap();
        assert_eq!(item.title, "Cloud Update");
        assert_eq!(item.source, "Unknown");
        assert_eq!(item.published_date, ts);
        assert_eq!(item.description.as_deref(), Some(""));
        assert_eq!(item.category.as_deref(), Some("Dev"));
    }

    #[test]
    fn social_post_gets_permalink_and_topic() {
        let post = SocialRecord {
            id: Some("123".into()),
            text: Some("OpenAI announced a thing #ai".into()),
            created_at: None,
            likes: 10,
            reposts: 2,
        };
        let item = normalize(RawRecord::Social(post), SourceKind::Social).unwrap();
        assert_eq!(item.link, "https://twitter.com/i/web/status/123");
        assert_eq!(item.source, "social");
        assert_eq!(item.category.as_deref(), Some("AI/ML"));
        assert_eq!(item.published_date, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn post_of_only_links_is_skipped() {
        let post = SocialRecord {
            id: Some("9".into()),
            text: Some("https://t.co/x @someone".into()),
            ..Default::default()
        };
        assert!(normalize(RawRecord::Social(post), SourceKind::Social).is_none());
    }

    #[test]
    fn missing_feed_source_falls_back_per_kind() {
        let rec = FeedRecord {
            title: Some("t".into()),
            link: Some("https://x.test".into()),
            ..Default::default()
        };
        let item = normalize(RawRecord::Feed(rec), SourceKind::SocialSearch).unwrap();
        assert_eq!(item.source, "Reddit");
    }
}
