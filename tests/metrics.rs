// tests/metrics.rs
//
// The Prometheus recorder is process-global, so this file holds a single test.

mod common;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
};
use chrono::Utc;
use tower::ServiceExt as _;

use tech_trends::metrics::Metrics;
use tech_trends::pipeline::fetch_and_store;
use tech_trends::store::TrendStore;

#[tokio::test]
async fn metrics_endpoint_exposes_pipeline_series() {
    let metrics = Metrics::init().expect("install recorder");

    let now = Utc::now();
    let dir = tempfile::tempdir().unwrap();
    let settings = common::test_settings(&dir.path().join("trends.json"));
    let sources = common::source_set(
        &settings,
        common::transport_without(&[common::NEWS_URL], now),
    );
    fetch_and_store(&sources, &TrendStore::new(&settings.data_path), now)
        .await
        .expect("stored");

    let req = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let resp = metrics.router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let text = String::from_utf8(
        body::to_bytes(resp.into_body(), common::BODY_LIMIT)
            .await
            .unwrap()
            .to_vec(),
    )
    .unwrap();

    assert!(text.contains("trends_source_items_total"), "{text}");
    assert!(text.contains("trends_source_errors_total"), "{text}");
    assert!(text.contains("trends_last_store_ts"), "{text}");
    assert!(text.contains("trends_fetch_ms"), "{text}");

    // a second recorder cannot be installed
    assert!(Metrics::init().is_err());
}
