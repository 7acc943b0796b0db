// src/api.rs
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::TrendError;
use crate::pipeline::{self, SourceSet};
use crate::store::TrendStore;
use crate::summarize::Summarizer;
use crate::trends::views::{NewsResponse, RankedResponse, RssResponse, SocialSearchResponse};

#[derive(Clone)]
pub struct AppState {
    pub sources: SourceSet,
    pub store: TrendStore,
    pub summarizer: Summarizer,
    pub top_n: usize,
}

impl AppState {
    pub fn new(sources: SourceSet, store: TrendStore, summarizer: Summarizer, top_n: usize) -> Self {
        Self {
            sources,
            store,
            summarizer,
            top_n,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(|| async { "OK" }))
        .route("/trends/social", get(social_trends))
        .route("/trends/rss", get(rss_trends))
        .route("/trends/news", get(news_trends))
        .route("/trends/social-search", get(social_search_trends))
        .route("/trends/top", get(top_trends))
        .route("/trends/summarize", post(summarize))
        .route("/fetch-and-store", get(fetch_and_store))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// 500 with `{success:false, message, error}`.
#[derive(Debug)]
pub struct ApiError {
    message: &'static str,
    error: TrendError,
}

impl ApiError {
    fn new(message: &'static str, error: TrendError) -> Self {
        Self { message, error }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self.error, "{}", self.message);
        let body = json!({
            "success": false,
            "message": self.message,
            "error": self.error.to_string(),
        });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Either the payload or a 500 carrying the endpoint's own failure envelope.
fn envelope<T: Serialize>(res: Result<T, TrendError>, failed: impl FnOnce(TrendError) -> T) -> Response {
    match res {
        Ok(v) => Json(v).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "source endpoint failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(failed(e))).into_response()
        }
    }
}

async fn index() -> Json<serde_json::Value> {
    Json(json!({ "message": "Tech Trends API is running" }))
}

async fn social_trends(State(state): State<AppState>) -> Result<Json<RankedResponse>, ApiError> {
    pipeline::social_trends(&state.sources, Utc::now(), state.top_n)
        .await
        .map(|data| Json(RankedResponse::ok(data)))
        .map_err(|e| ApiError::new("Failed to fetch social trends", e))
}

async fn rss_trends(State(state): State<AppState>) -> Response {
    let now = Utc::now();
    envelope(pipeline::rss_view(&state.sources, now).await, |e| {
        RssResponse::failed(e, now)
    })
}

async fn news_trends(State(state): State<AppState>) -> Response {
    let now = Utc::now();
    envelope(pipeline::news_view(&state.sources, now).await, |e| {
        NewsResponse::failed(e, now)
    })
}

async fn social_search_trends(State(state): State<AppState>) -> Response {
    let now = Utc::now();
    envelope(pipeline::social_search_view(&state.sources, now).await, |e| {
        SocialSearchResponse::failed(e, now)
    })
}

async fn top_trends(State(state): State<AppState>) -> Result<Json<RankedResponse>, ApiError> {
    let snapshot = state
        .store
        .load()
        .await
        .map_err(|e| ApiError::new("Failed to read stored trends", e))?;
    let ranked = pipeline::ranked_from_snapshot(&snapshot, Utc::now(), state.top_n);
    Ok(Json(RankedResponse::ok(ranked)))
}

async fn summarize(
    State(state): State<AppState>,
) -> Result<Json<Vec<crate::summarize::SummarizedTrend>>, ApiError> {
    pipeline::summarize_stored(&state.store, &state.summarizer, Utc::now(), state.top_n)
        .await
        .map(Json)
        .map_err(|e| ApiError::new("Failed to summarize trends", e))
}

async fn fetch_and_store(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    pipeline::fetch_and_store(&state.sources, &state.store, Utc::now())
        .await
        .map_err(|e| ApiError::new("Failed to fetch and store trends", e))?;
    Ok(Json(json!({ "message": "Data fetched and stored successfully" })))
}
