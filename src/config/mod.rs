// src/config/mod.rs
pub mod ai;
pub mod settings;
pub mod sources;

pub use ai::AiConfig;
pub use settings::AppSettings;
pub use sources::{CategorizedFeed, SourcesConfig};
