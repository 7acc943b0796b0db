// src/store.rs
//! The combined snapshot on disk: last full response of each stored source.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::TrendError;
use crate::trends::views::{NewsResponse, RssResponse, SocialSearchResponse};

/// `social` holds the social-search (Reddit) response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedSnapshot {
    pub rss: RssResponse,
    pub news: NewsResponse,
    pub social: SocialSearchResponse,
}

/// Whole-file JSON store. Each save writes its own temp file next to the
/// target and renames it over. There is no lock: concurrent saves all
/// succeed and the last rename wins.
#[derive(Debug, Clone)]
pub struct TrendStore {
    path: PathBuf,
}

impl TrendStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn save(&self, snapshot: &CombinedSnapshot) -> Result<(), TrendError> {
        let dir = match self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            Some(d) => d.to_path_buf(),
            None => PathBuf::from("."),
        };
        tokio::fs::create_dir_all(&dir).await?;
        let json = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| TrendError::PersistenceError(e.to_string()))?;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> Result<(), TrendError> {
            let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
            tmp.write_all(&json)?;
            tmp.persist(&path)
                .map_err(|e| TrendError::PersistenceError(format!("{}: {e}", path.display())))?;
            Ok(())
        })
        .await
        .map_err(|e| TrendError::PersistenceError(e.to_string()))??;

        tracing::debug!(path = %self.path.display(), "snapshot written");
        Ok(())
    }

    pub async fn load(&self) -> Result<CombinedSnapshot, TrendError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            TrendError::PersistenceError(format!("{}: {e}", self.path.display()))
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            TrendError::PersistenceError(format!("{}: {e}", self.path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snapshot() -> CombinedSnapshot {
        let now = Utc::now();
        CombinedSnapshot {
            rss: RssResponse::ok(vec![], now),
            news: NewsResponse::failed("boom", now),
            social: SocialSearchResponse::ok(vec![], now),
        }
    }

    #[tokio::test]
    async fn save_creates_parent_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = TrendStore::new(dir.path().join("nested/trends.json"));
        store.save(&snapshot()).await.unwrap();
        store.save(&snapshot()).await.unwrap();

        let back = store.load().await.unwrap();
        assert!(back.rss.success);
        assert!(!back.news.success);
        assert_eq!(back.news.error.as_deref(), Some("boom"));
        let leftovers = std::fs::read_dir(dir.path().join("nested")).unwrap().count();
        assert_eq!(leftovers, 1, "temp files left behind");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_saves_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let store = TrendStore::new(dir.path().join("trends.json"));
        let snap = snapshot();

        for _ in 0..50 {
            let (a, b) = tokio::join!(store.save(&snap), store.save(&snap));
            a.unwrap();
            b.unwrap();
            assert_eq!(store.load().await.unwrap(), snap);
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn missing_or_corrupt_file_is_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = TrendStore::new(dir.path().join("trends.json"));
        assert!(matches!(store.load().await, Err(TrendError::PersistenceError(_))));

        std::fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.load().await, Err(TrendError::PersistenceError(_))));
    }
}
