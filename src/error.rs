// src/error.rs
//! Error taxonomy shared by adapters, the summarizer and the persisted snapshot.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrendError {
    /// Network, HTTP status or parse failure inside one adapter. Non-fatal for the pipeline.
    #[error("source '{source_name}' unavailable: {reason}")]
    SourceUnavailable { source_name: String, reason: String },

    /// Missing or rejected credential for an adapter. Handled like `SourceUnavailable`.
    #[error("authentication failed for '{source_name}'")]
    AuthenticationError { source_name: String },

    /// The language-model reply did not contain a parsable JSON array.
    #[error("malformed model response: {0}")]
    MalformedModelResponse(String),

    /// Reading or writing the combined snapshot failed.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Every adapter of a pipeline run failed.
    #[error("no source produced data")]
    NoSourcesSucceeded,
}

impl TrendError {
    pub fn unavailable(source: impl Into<String>, reason: impl ToString) -> Self {
        Self::SourceUnavailable {
            source_name: source.into(),
            reason: reason.to_string(),
        }
    }

    pub fn auth(source: impl Into<String>) -> Self {
        Self::AuthenticationError {
            source_name: source.into(),
        }
    }

    /// True for failures that only knock out a single source.
    pub fn is_source_level(&self) -> bool {
        matches!(
            self,
            Self::SourceUnavailable { .. } | Self::AuthenticationError { .. }
        )
    }
}

impl From<std::io::Error> for TrendError {
    fn from(e: std::io::Error) -> Self {
        Self::PersistenceError(e.to_string())
    }
}
