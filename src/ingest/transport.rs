// src/ingest/transport.rs
//! Body fetch for source adapters: real HTTP, or an in-memory URL → body map for tests.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::StatusCode;

use crate::error::TrendError;

const USER_AGENT: &str = "tech-trends-aggregator/0.1";

#[derive(Debug, Clone)]
pub enum Transport {
    Http(reqwest::Client),
    Fixture(HashMap<String, String>),
}

/// Optional credential attached to a request.
#[derive(Debug, Clone, Copy)]
pub enum Credential<'a> {
    None,
    Bearer(&'a str),
    Header(&'static str, &'a str),
}

impl Transport {
    /// HTTP transport with an explicit per-request timeout.
    pub fn http(timeout: Duration) -> Result<Self, TrendError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(4))
            .timeout(timeout)
            .build()
            .map_err(|e| TrendError::unavailable("http", e))?;
        Ok(Transport::Http(client))
    }

    pub fn fixtures<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Transport::Fixture(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// GET `url` and return the body. `source` only labels errors.
    pub async fn get_text(
        &self,
        source: &str,
        url: &str,
        query: &[(&str, String)],
        credential: Credential<'_>,
    ) -> Result<String, TrendError> {
        match self {
            Transport::Fixture(bodies) => bodies
                .get(url)
                .cloned()
                .ok_or_else(|| TrendError::unavailable(source, format!("no route to {url}"))),
            Transport::Http(client) => {
                let mut req = client.get(url).query(query);
                req = match credential {
                    Credential::None => req,
                    Credential::Bearer(token) => req.bearer_auth(token),
                    Credential::Header(name, value) => req.header(name, value),
                };
                let resp = req
                    .send()
                    .await
                    .map_err(|e| TrendError::unavailable(source, e))?;
                let status = resp.status();
                if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                    return Err(TrendError::auth(source));
                }
                if status == StatusCode::TOO_MANY_REQUESTS {
                    return Err(TrendError::unavailable(source, "rate limited"));
                }
                if !status.is_success() {
                    return Err(TrendError::unavailable(source, format!("status {status}")));
                }
                resp.text()
                    .await
                    .map_err(|e| TrendError::unavailable(source, e))
            }
        }
    }
}
