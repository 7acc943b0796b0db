// src/summarize/mod.rs
//! Ranked trends → model prompt → parsed JSON array.

pub mod provider;

use metrics::counter;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::TrendError;
use crate::trends::aggregate::AggregatedTrend;
use provider::{DisabledProvider, DynModelProvider};

pub use provider::{build_model_provider, MockProvider, ModelProvider, OpenAiProvider};

pub const SYSTEM_PROMPT: &str = "You are a professional trend analyst in the tech industry.";

/// The reply is cut to this many entries whatever the model returns.
pub const SUMMARY_LIMIT: usize = 10;

/// One entry of the model's reply; also the shape the prompt sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizedTrend {
    pub title: String,
    #[serde(default)]
    pub source: Vec<String>,
    #[serde(default)]
    pub url: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl From<&AggregatedTrend> for SummarizedTrend {
    fn from(t: &AggregatedTrend) -> Self {
        Self {
            title: t.title.clone(),
            source: t.sources.clone(),
            url: t.urls.clone(),
            description: t.description.clone(),
        }
    }
}

/// Prompt embedding the ranked list as pretty JSON. The list goes last so the
/// only bracketed JSON in the prompt is the data itself.
pub fn build_prompt(ranked: &[AggregatedTrend]) -> String {
    let entries: Vec<SummarizedTrend> = ranked.iter().map(SummarizedTrend::from).collect();
    let data = serde_json::to_string_pretty(&entries).unwrap_or_else(|_| "[]".to_string());
    format!(
        "Below is a list of trending tech stories, most popular first. Each entry has a title, \
the list of sources that reported it, the list of article urls and a description.\n\
\n\
Rewrite it into at most {SUMMARY_LIMIT} entries:\n\
- merge entries that describe the same story, keeping every source and url;\n\
- write a concise, informative description for each entry;\n\
- leave out tutorials, basic explanations and other low-value content;\n\
- keep the most popular stories first.\n\
\n\
Answer with a single JSON array inside a ```json fenced block. Every element is an object \
with the keys \"title\" (string), \"source\" (array of strings), \"url\" (array of strings) \
and \"description\" (string). Do not add any other keys.\n\
\n\
Trends:\n{data}\n"
    )
}

static ARRAY_OF_OBJECTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[\s*\{").expect("array start regex"));

/// First `[ { ... } ]` in a free-text reply that parses as a trend list.
/// Each candidate is read as one JSON value, so prose (or another bracketed
/// snippet) after a valid array does not spoil it.
pub fn extract_json_array(reply: &str) -> Result<Vec<SummarizedTrend>, TrendError> {
    let mut last_err = None;
    for (start, _) in reply.match_indices('[') {
        let rest = &reply[start..];
        if !ARRAY_OF_OBJECTS.is_match(rest) {
            continue;
        }
        let mut values =
            serde_json::Deserializer::from_str(rest).into_iter::<Vec<SummarizedTrend>>();
        match values.next() {
            Some(Ok(trends)) => return Ok(trends),
            Some(Err(e)) => last_err = Some(e),
            None => {}
        }
    }
    Err(TrendError::MalformedModelResponse(match last_err {
        Some(e) => format!("invalid JSON array: {e}"),
        None => "no JSON array in reply".into(),
    }))
}

/// Runs the model over a ranked list.
#[derive(Clone)]
pub struct Summarizer {
    provider: DynModelProvider,
}

impl Summarizer {
    pub fn new(provider: DynModelProvider) -> Self {
        Self { provider }
    }

    pub fn disabled() -> Self {
        Self::new(std::sync::Arc::new(DisabledProvider))
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub async fn summarize(
        &self,
        ranked: &[AggregatedTrend],
    ) -> Result<Vec<SummarizedTrend>, TrendError> {
        counter!("trends_summarize_total").increment(1);
        let prompt = build_prompt(ranked);

        let reply = match self.provider.complete(SYSTEM_PROMPT, &prompt).await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, provider = self.provider.name(), "model call failed");
                counter!("trends_model_errors_total").increment(1);
                return Err(e);
            }
        };
        tracing::debug!(provider = self.provider.name(), reply = %reply, "model reply");

        let mut trends = extract_json_array(&reply).map_err(|e| {
            tracing::error!(error = %e, provider = self.provider.name(), "unusable model reply");
            counter!("trends_model_errors_total").increment(1);
            e
        })?;
        trends.truncate(SUMMARY_LIMIT);
        Ok(trends)
    }
}
