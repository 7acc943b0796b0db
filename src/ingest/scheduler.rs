// src/ingest/scheduler.rs
use std::time::Duration;

use metrics::counter;
use tokio::task::JoinHandle;

use crate::pipeline::{fetch_and_store, SourceSet};
use crate::store::TrendStore;

/// Spawn a background task that runs fetch-and-store every `every`.
/// The first run happens immediately. Errors are logged; the loop never exits.
pub fn spawn_refresh_scheduler(sources: SourceSet, store: TrendStore, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let now = chrono::Utc::now();
            counter!("trends_refresh_runs_total").increment(1);
            match fetch_and_store(&sources, &store, now).await {
                Ok(snapshot) => tracing::info!(
                    target: "ingest",
                    rss_ok = snapshot.rss.success,
                    news_ok = snapshot.news.success,
                    social_ok = snapshot.social.success,
                    "refresh tick"
                ),
                Err(e) => {
                    counter!("trends_refresh_errors_total").increment(1);
                    tracing::warn!(target: "ingest", error = %e, "refresh tick failed");
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppSettings, SourcesConfig};
    use crate::ingest::transport::Transport;

    #[tokio::test]
    async fn failing_ticks_do_not_stop_the_task() {
        let dir = tempfile::tempdir().unwrap();
        let store = TrendStore::new(dir.path().join("trends.json"));
        let settings = AppSettings {
            feed_delay_ms: 0,
            ..AppSettings::default()
        };
        // empty fixture map: every source fails
        let sources = SourceSet::build(&settings, &SourcesConfig::default(), Transport::fixtures(Vec::<(String, String)>::new()));

        let handle = spawn_refresh_scheduler(sources, store.clone(), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(!handle.is_finished());
        assert!(!store.path().exists());
        handle.abort();
    }
}
