//! Tech Trends service: binary entrypoint.
//! Loads configuration, wires adapters and the summarizer, and serves the axum router.

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tech_trends::api::{self, AppState};
use tech_trends::config::{AiConfig, AppSettings, SourcesConfig};
use tech_trends::ingest::scheduler::spawn_refresh_scheduler;
use tech_trends::ingest::transport::Transport;
use tech_trends::metrics::Metrics;
use tech_trends::pipeline::SourceSet;
use tech_trends::store::TrendStore;
use tech_trends::summarize::{build_model_provider, Summarizer};

/// `RUST_LOG` filter (default `tech_trends=info,warn`); `TRENDS_LOG_FORMAT=json`
/// switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tech_trends=info,warn"));

    let json = std::env::var("TRENDS_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing .env is fine.
    let _ = dotenvy::dotenv();
    init_tracing();

    let settings = AppSettings::from_env();
    let sources_cfg = SourcesConfig::load_default().context("loading sources config")?;
    let ai_cfg = AiConfig::load().context("loading AI config")?;

    let metrics = match Metrics::init() {
        Ok(m) => Some(m),
        Err(e) if cfg!(feature = "strict-metrics") => {
            return Err(e).context("installing Prometheus recorder");
        }
        Err(e) => {
            tracing::warn!(error = %e, "metrics recorder not installed; /metrics disabled");
            None
        }
    };

    let transport = Transport::http(settings.http_timeout).context("building HTTP client")?;
    let sources = SourceSet::build(&settings, &sources_cfg, transport);
    let store = TrendStore::new(settings.data_path.clone());
    let summarizer = Summarizer::new(build_model_provider(&ai_cfg, settings.http_timeout * 6));

    tracing::info!(
        port = settings.port,
        data_path = %settings.data_path.display(),
        rss_feeds = sources_cfg.rss_feeds.len(),
        social_feeds = sources_cfg.social_feeds.len(),
        news_key = settings.news_api_key.is_some(),
        social_token = settings.social_bearer_token.is_some(),
        model = summarizer.provider_name(),
        "starting tech trends service"
    );

    if let Some(every) = settings.refresh_every {
        tracing::info!(every_secs = every.as_secs(), "background refresh enabled");
        spawn_refresh_scheduler(sources.clone(), store.clone(), every);
    }

    let state = AppState::new(sources, store, summarizer, settings.top_n);
    let mut app = api::router(state);
    if let Some(m) = &metrics {
        app = app.merge(m.router());
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
