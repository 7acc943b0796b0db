// src/ingest/feed.rs
//! RSS 2.0 and Atom parsing into `FeedRecord`s.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use quick_xml::de::from_str;
use serde::Deserialize;
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::OffsetDateTime;

use crate::ingest::normalize_text;
use crate::ingest::types::FeedRecord;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    title: Option<String>,
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomFeed {
    title: Option<TextNode>,
    #[serde(rename = "entry", default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    title: Option<TextNode>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    published: Option<String>,
    updated: Option<String>,
    summary: Option<TextNode>,
    content: Option<TextNode>,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

// Atom text constructs carry a `type` attribute, so read the text node explicitly.
#[derive(Debug, Deserialize)]
struct TextNode {
    #[serde(rename = "$text", default)]
    value: String,
}

/// A parsed feed: its own title plus entries.
#[derive(Debug, Clone, Default)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub records: Vec<FeedRecord>,
}

/// Parse RSS first, then Atom. Atom parsing accepts documents without entries,
/// so RSS must be tried first to get a real error for garbage input.
pub fn parse_feed(xml: &str) -> Result<ParsedFeed> {
    let xml = scrub_html_entities_for_xml(xml);

    if let Ok(rss) = from_str::<Rss>(&xml) {
        return Ok(from_rss(rss));
    }
    match from_str::<AtomFeed>(&xml) {
        Ok(atom) if atom.title.is_some() || !atom.entries.is_empty() => Ok(from_atom(atom)),
        Ok(_) => Err(anyhow!("document is neither RSS nor Atom")),
        Err(e) => Err(anyhow!(e).context("parsing feed xml")),
    }
}

fn from_rss(rss: Rss) -> ParsedFeed {
    let title = non_empty(rss.channel.title.as_deref().map(normalize_text));
    let records = rss
        .channel
        .items
        .into_iter()
        .map(|it| FeedRecord {
            title: non_empty(it.title.as_deref().map(normalize_text)),
            link: non_empty(it.link.map(|l| l.trim().to_string())),
            source: title.clone(),
            published: it.pub_date.as_deref().and_then(parse_timestamp),
            description: non_empty(it.description.as_deref().map(normalize_text)),
            category: None,
        })
        .collect();
    ParsedFeed { title, records }
}

fn from_atom(atom: AtomFeed) -> ParsedFeed {
    let title = non_empty(atom.title.map(|t| normalize_text(&t.value)));
    let records = atom
        .entries
        .into_iter()
        .map(|e| {
            let link = e
                .links
                .iter()
                .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
                .or_else(|| e.links.first())
                .and_then(|l| l.href.clone());
            let published = e
                .published
                .as_deref()
                .or(e.updated.as_deref())
                .and_then(parse_timestamp);
            let description = e.summary.or(e.content).map(|t| normalize_text(&t.value));
            FeedRecord {
                title: non_empty(e.title.map(|t| normalize_text(&t.value))),
                link: non_empty(link.map(|l| l.trim().to_string())),
                source: title.clone(),
                published,
                description: non_empty(description),
                category: None,
            }
        })
        .collect();
    ParsedFeed { title, records }
}

/// RFC 2822 (RSS `pubDate`) or RFC 3339 (Atom, headline APIs) → UTC.
pub fn parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    let ts = ts.trim();
    let unix = OffsetDateTime::parse(ts, &Rfc2822)
        .or_else(|_| OffsetDateTime::parse(ts, &Rfc3339))
        .map(|dt| dt.unix_timestamp())
        .ok();
    match unix {
        Some(secs) => DateTime::from_timestamp(secs, 0),
        // `time` is strict about obsolete zone names; chrono accepts more of them.
        None => DateTime::parse_from_rfc2822(ts)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}

fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&hellip;", "...")
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>TechCrunch</title>
  <link>https://techcrunch.com</link>
  <item>
    <title>New AI Tool&nbsp;ships</title>
    <link>https://techcrunch.com/a</link>
    <pubDate>Tue, 10 Jun 2025 14:00:00 +0000</pubDate>
    <description><![CDATA[<p>An <b>AI</b> launch</p>]]></description>
  </item>
  <item>
    <link>https://techcrunch.com/b</link>
  </item>
</channel></rss>"#;

    const ATOM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="text">programming</title>
  <entry>
    <title>[42] Rust 2.0 released</title>
    <link href="https://reddit.test/r/programming/1"/>
    <updated>2025-06-10T12:30:00+00:00</updated>
    <content type="html">&lt;p&gt;discussion&lt;/p&gt;</content>
  </entry>
</feed>"#;

    #[test]
    fn parses_rss_items_with_channel_source() {
        let feed = parse_feed(RSS).unwrap();
        assert_eq!(feed.title.as_deref(), Some("TechCrunch"));
        assert_eq!(feed.records.len(), 2);

        let first = &feed.records[0];
        assert_eq!(first.title.as_deref(), Some("New AI Tool ships"));
        assert_eq!(first.link.as_deref(), Some("https://techcrunch.com/a"));
        assert_eq!(first.source.as_deref(), Some("TechCrunch"));
        assert_eq!(first.description.as_deref(), Some("An AI launch"));
        assert_eq!(
            first.published.unwrap().to_rfc3339(),
            "2025-06-10T14:00:00+00:00"
        );

        assert!(feed.records[1].title.is_none());
    }

    #[test]
    fn parses_atom_entries() {
        let feed = parse_feed(ATOM).unwrap();
        assert_eq!(feed.title.as_deref(), Some("programming"));
        let e = &feed.records[0];
        assert_eq!(e.title.as_deref(), Some("[42] Rust 2.0 released"));
        assert_eq!(e.link.as_deref(), Some("https://reddit.test/r/programming/1"));
        assert_eq!(e.description.as_deref(), Some("discussion"));
        assert!(e.published.is_some());
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_feed("definitely not xml").is_err());
    }

    #[test]
    fn timestamps_accept_both_formats() {
        assert!(parse_timestamp("Tue, 10 Jun 2025 14:00:00 GMT").is_some());
        assert!(parse_timestamp("2025-06-10T14:00:00Z").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
