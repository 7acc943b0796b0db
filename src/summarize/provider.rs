//! Language-model providers behind the summarizer.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::AiConfig;
use crate::error::TrendError;

pub const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Reply future returned by every provider.
pub type ReplyFuture<'a> = Pin<Box<dyn Future<Output = Result<String, TrendError>> + Send + 'a>>;

/// A text-in, text-out model call. No streaming.
pub trait ModelProvider: Send + Sync {
    fn complete<'a>(&'a self, system: &'a str, prompt: &'a str) -> ReplyFuture<'a>;
    fn name(&self) -> &'static str;
}

pub type DynModelProvider = Arc<dyn ModelProvider>;

/// Chat Completions provider. The key is checked per call, so a missing key
/// surfaces as `AuthenticationError` instead of a startup failure.
pub struct OpenAiProvider {
    http: reqwest::Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiProvider {
    pub fn new(cfg: &AiConfig, timeout: Duration) -> Result<Self, TrendError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("tech-trends-aggregator/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4))
            .timeout(timeout)
            .build()
            .map_err(|e| TrendError::unavailable("openai", e))?;
        Ok(Self {
            http,
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            max_tokens: cfg.max_tokens,
            temperature: cfg.temperature,
        })
    }
}

#[derive(Serialize)]
struct ChatMsg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatReq<'a> {
    model: &'a str,
    messages: Vec<ChatMsg<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResp {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMsg,
}

#[derive(Deserialize)]
struct ChoiceMsg {
    #[serde(default)]
    content: Option<String>,
}

impl ModelProvider for OpenAiProvider {
    fn complete<'a>(&'a self, system: &'a str, prompt: &'a str) -> ReplyFuture<'a> {
        Box::pin(async move {
            if self.api_key.trim().is_empty() {
                return Err(TrendError::auth(self.name()));
            }

            let req = ChatReq {
                model: &self.model,
                messages: vec![
                    ChatMsg {
                        role: "system",
                        content: system,
                    },
                    ChatMsg {
                        role: "user",
                        content: prompt,
                    },
                ],
                temperature: self.temperature,
                max_tokens: self.max_tokens,
            };

            let resp = self
                .http
                .post(OPENAI_CHAT_URL)
                .bearer_auth(&self.api_key)
                .json(&req)
                .send()
                .await
                .map_err(|e| TrendError::unavailable(self.name(), e))?;

            let status = resp.status();
            if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
                return Err(TrendError::auth(self.name()));
            }
            if !status.is_success() {
                return Err(TrendError::unavailable(self.name(), format!("HTTP {status}")));
            }

            let body: ChatResp = resp
                .json()
                .await
                .map_err(|e| TrendError::MalformedModelResponse(e.to_string()))?;
            body.choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .filter(|c| !c.trim().is_empty())
                .ok_or_else(|| TrendError::MalformedModelResponse("empty completion".into()))
        })
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

/// Summarizer switched off in configuration.
pub struct DisabledProvider;

impl ModelProvider for DisabledProvider {
    fn complete<'a>(&'a self, _system: &'a str, _prompt: &'a str) -> ReplyFuture<'a> {
        Box::pin(async { Err(TrendError::unavailable("model", "summarizer disabled")) })
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

/// Canned reply for tests and offline runs.
#[derive(Clone)]
pub struct MockProvider {
    pub fixed: String,
}

impl MockProvider {
    pub fn new(fixed: impl Into<String>) -> Self {
        Self { fixed: fixed.into() }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(
            "Here are the trends (mock):\n```json\n[{\"title\":\"Mock trend\",\"source\":[\"mock\"],\"url\":[\"https://example.com/mock\"],\"description\":\"Deterministic mock summary.\"}]\n```",
        )
    }
}

impl ModelProvider for MockProvider {
    fn complete<'a>(&'a self, _system: &'a str, _prompt: &'a str) -> ReplyFuture<'a> {
        let out = self.fixed.clone();
        Box::pin(async move { Ok(out) })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Pick a provider for the given config.
///
/// * `AI_TEST_MODE=mock` → `MockProvider`.
/// * disabled or unknown provider → `DisabledProvider`.
/// * otherwise the OpenAI chat provider.
pub fn build_model_provider(cfg: &AiConfig, timeout: Duration) -> DynModelProvider {
    if std::env::var("AI_TEST_MODE")
        .map(|v| v == "mock")
        .unwrap_or(false)
    {
        return Arc::new(MockProvider::default());
    }
    if !cfg.enabled {
        return Arc::new(DisabledProvider);
    }
    match cfg.provider.as_str() {
        "openai" => match OpenAiProvider::new(cfg, timeout) {
            Ok(p) => Arc::new(p),
            Err(e) => {
                tracing::warn!(error = %e, "model client build failed; summarizer disabled");
                Arc::new(DisabledProvider)
            }
        },
        other => {
            tracing::warn!(provider = other, "unsupported model provider; summarizer disabled");
            Arc::new(DisabledProvider)
        }
    }
}
