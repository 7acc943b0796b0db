// tests/partial_failure.rs
//
// fetch-and-store with failing adapters: survivors are stored, a total failure writes nothing.

mod common;

use chrono::Utc;

use tech_trends::pipeline::{fetch_and_store, ranked_from_snapshot};
use tech_trends::store::TrendStore;
use tech_trends::TrendError;

#[tokio::test]
async fn failing_headlines_do_not_hide_the_other_sources() {
    let now = Utc::now();
    let dir = tempfile::tempdir().unwrap();
    let settings = common::test_settings(&dir.path().join("trends.json"));
    let sources = common::source_set(
        &settings,
        common::transport_without(&[common::NEWS_URL], now),
    );
    let store = TrendStore::new(&settings.data_path);

    fetch_and_store(&sources, &store, now).await.expect("partial success");
    let snap = store.load().await.expect("snapshot readable");

    assert!(snap.rss.success);
    assert_eq!(snap.rss.articles.len(), 4);
    assert!(snap.social.success);
    assert_eq!(snap.social.post_count, 3);

    assert!(!snap.news.success);
    assert_eq!(snap.news.trends_count, 0);
    assert!(snap.news.error.as_deref().unwrap_or_default().contains("unavailable"));
}

#[tokio::test]
async fn missing_news_key_is_stored_as_auth_failure() {
    let now = Utc::now();
    let dir = tempfile::tempdir().unwrap();
    let mut settings = common::test_settings(&dir.path().join("trends.json"));
    settings.news_api_key = None;
    let sources = common::source_set(&settings, common::full_transport(now));
    let store = TrendStore::new(&settings.data_path);

    let snap = fetch_and_store(&sources, &store, now).await.expect("stored");
    assert!(!snap.news.success);
    assert!(snap.news.error.as_deref().unwrap_or_default().contains("authentication"));
}

#[tokio::test]
async fn every_source_failing_leaves_the_file_alone() {
    let now = Utc::now();
    let dir = tempfile::tempdir().unwrap();
    let settings = common::test_settings(&dir.path().join("trends.json"));
    let sources = common::source_set(
        &settings,
        common::transport_without(
            &[
                common::RSS_TECH,
                common::RSS_DEV,
                common::NEWS_URL,
                common::REDDIT_PROGRAMMING,
                common::REDDIT_ML,
            ],
            now,
        ),
    );
    let store = TrendStore::new(&settings.data_path);

    let err = fetch_and_store(&sources, &store, now).await.unwrap_err();
    assert!(matches!(err, TrendError::NoSourcesSucceeded));
    assert!(!store.path().exists());
}

#[tokio::test]
async fn ranking_over_the_stored_snapshot() {
    let now = Utc::now();
    let dir = tempfile::tempdir().unwrap();
    let settings = common::test_settings(&dir.path().join("trends.json"));
    let sources = common::source_set(&settings, common::full_transport(now));
    let store = TrendStore::new(&settings.data_path);

    let snap = fetch_and_store(&sources, &store, now).await.expect("stored");
    let ranked = ranked_from_snapshot(&snap, now, 10);
    let titles: Vec<&str> = ranked.iter().map(|t| t.title.as_str()).collect();

    // "Cloud basics" is a tutorial and never reaches the ranking
    assert_eq!(
        titles,
        vec![
            "New AI Tool",
            "Kubernetes security flaw patched",
            "Cloud Update",
            "Transformers everywhere",
            "Rust 2.0 released",
        ]
    );
    assert_eq!(ranked[0].count, 4);
    assert_eq!(
        ranked[0].sources,
        vec!["Tech Daily", "Dev Weekly", "The Verge", "Reddit"]
    );
    // the headline lands in two news categories and is counted twice
    assert_eq!(ranked[1].count, 2);
}
