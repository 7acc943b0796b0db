// src/ingest/mod.rs
pub mod feed;
pub mod freshness;
pub mod normalize;
pub mod providers;
pub mod rate_limit;
pub mod scheduler;
pub mod transport;
pub mod types;

use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;

use crate::error::TrendError;
use crate::ingest::freshness::{freshness_window, retain_fresh};
use crate::ingest::types::{RawRecord, SourceProvider, TrendItem};

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "trends_source_items_total",
            "Items kept per source after normalization and freshness filtering."
        );
        describe_counter!(
            "trends_source_errors_total",
            "Source adapter failures (whole source skipped)."
        );
        describe_counter!(
            "trends_feed_errors_total",
            "Single feed failures inside a multi-feed adapter."
        );
        describe_counter!(
            "trends_skipped_total",
            "Raw records dropped for a missing title or link."
        );
        describe_counter!(
            "trends_stale_dropped_total",
            "Items dropped by the freshness window."
        );
        describe_histogram!("trends_fetch_ms", "Source fetch time in milliseconds.");
        describe_counter!("trends_summarize_total", "Summarize pipeline runs.");
        describe_counter!(
            "trends_model_errors_total",
            "Language-model calls that failed or returned unusable output."
        );
        describe_counter!("trends_refresh_runs_total", "Background refresh ticks.");
        describe_counter!(
            "trends_refresh_errors_total",
            "Background refresh ticks that stored nothing."
        );
        describe_gauge!(
            "trends_last_store_ts",
            "Unix ts of the last successful fetch-and-store."
        );
    });
}

/// Normalize text: decode entities, strip tags, fold quotes and whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").expect("ws regex"));
    out = re_ws.replace_all(&out, " ").trim().to_string();

    // 5) Length cap: 1500 chars
    if out.chars().count() > 1500 {
        out = out.chars().take(1500).collect();
    }

    out
}

/// Normalize raw records and drop stale items. Returns (kept, skipped, stale).
pub fn normalize_and_filter(
    raw: Vec<RawRecord>,
    kind: types::SourceKind,
    now: DateTime<Utc>,
) -> (Vec<TrendItem>, usize, usize) {
    let total = raw.len();
    let items: Vec<TrendItem> = raw
        .into_iter()
        .filter_map(|r| normalize::normalize(r, kind))
        .collect();
    let skipped = total - items.len();
    let (kept, stale) = retain_fresh(items, now, freshness_window());
    (kept, skipped, stale)
}

/// Fetch one source and run it through the normalizer and the freshness filter.
pub async fn collect_source(
    provider: &dyn SourceProvider,
    now: DateTime<Utc>,
) -> Result<Vec<TrendItem>, TrendError> {
    ensure_metrics_described();

    let raw = match provider.fetch_raw().await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(error = %e, provider = provider.name(), "provider error");
            counter!("trends_source_errors_total", "source" => provider.name()).increment(1);
            return Err(e);
        }
    };

    let engagement: u64 = raw
        .iter()
        .map(|r| match r {
            RawRecord::Social(p) => p.engagement(),
            RawRecord::Feed(_) => 0,
        })
        .sum();

    let (kept, skipped, stale) = normalize_and_filter(raw, provider.kind(), now);

    counter!("trends_source_items_total", "source" => provider.name()).increment(kept.len() as u64);
    counter!("trends_skipped_total").increment(skipped as u64);
    counter!("trends_stale_dropped_total").increment(stale as u64);

    tracing::info!(
        target: "ingest",
        provider = provider.name(),
        kept = kept.len(),
        skipped,
        stale,
        engagement,
        "source collected"
    );
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::{FeedRecord, SourceKind};
    use chrono::Duration;

    #[test]
    fn normalize_text_decodes_and_collapses() {
        let s = "  <p>Hello,&nbsp;&nbsp; <b>world</b>!</p>  ";
        assert_eq!(normalize_text(s), "Hello, world!");
    }

    #[test]
    fn normalize_text_folds_smart_quotes() {
        assert_eq!(normalize_text("\u{201C}ok\u{201D} it\u{2019}s"), "\"ok\" it's");
    }

    #[test]
    fn length_cap_applies() {
        assert_eq!(normalize_text(&"x".repeat(2_000)).chars().count(), 1_500);
    }

    #[test]
    fn normalize_and_filter_counts_drops() {
        let now = Utc::now();
        let rec = |title: Option<&str>, hours_ago: i64| {
            RawRecord::Feed(FeedRecord {
                title: title.map(str::to_string),
                link: Some("https://x.test".into()),
                published: Some(now - Duration::hours(hours_ago)),
                ..Default::default()
            })
        };
        let raw = vec![rec(Some("fresh"), 1), rec(None, 1), rec(Some("old"), 30)];
        let (kept, skipped, stale) = normalize_and_filter(raw, SourceKind::Rss, now);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "fresh");
        assert_eq!(skipped, 1);
        assert_eq!(stale, 1);
    }
}
