// src/config/ai.rs
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

pub const ENV_AI_CONFIG_PATH: &str = "AI_CONFIG_PATH";

fn default_model() -> String {
    "gpt-4".to_string()
}
fn default_max_tokens() -> u32 {
    800
}
fn default_temperature() -> f32 {
    0.7
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AiConfig {
    pub enabled: bool,
    /// Only "openai" is wired; anything else leaves the summarizer disabled.
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// "ENV" means: read from OPENAI_API_KEY.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: "openai".to_string(),
            model: default_model(),
            api_key: String::new(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl AiConfig {
    /// `$AI_CONFIG_PATH` if set, otherwise the environment.
    pub fn load() -> anyhow::Result<Self> {
        match env::var(ENV_AI_CONFIG_PATH) {
            Ok(p) if !p.trim().is_empty() => Self::load_from_file(p),
            _ => Ok(Self::from_env()),
        }
    }

    /// OPENAI_API_KEY / OPENAI_MODEL / AI_ENABLED. A missing key is not an error here;
    /// the summarizer reports it when called.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.api_key = env::var("OPENAI_API_KEY").unwrap_or_default();
        if let Ok(m) = env::var("OPENAI_MODEL") {
            if !m.trim().is_empty() {
                cfg.model = m.trim().to_string();
            }
        }
        if let Ok(v) = env::var("AI_ENABLED") {
            cfg.enabled = !matches!(v.trim(), "0" | "false" | "off");
        }
        cfg.sanitized()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)?;
        let mut cfg: AiConfig = serde_json::from_str(&data)?;

        cfg.provider = cfg.provider.to_lowercase();

        // Resolve api key if "ENV"; an unset variable leaves the key empty.
        if cfg.api_key.trim().eq_ignore_ascii_case("env") {
            cfg.api_key = match cfg.provider.as_str() {
                "openai" => env::var("OPENAI_API_KEY").unwrap_or_default(),
                other => anyhow::bail!("Unsupported provider in config: {other}"),
            };
        }

        Ok(cfg.sanitized())
    }

    pub fn has_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    fn sanitized(mut self) -> Self {
        if !(0.0..=2.0).contains(&self.temperature) {
            self.temperature = default_temperature();
        }
        if self.max_tokens == 0 {
            self.max_tokens = default_max_tokens();
        }
        self
    }
}
