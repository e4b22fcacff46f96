//! HTTP client for the Chess.com public API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, ClientBuilder, Url};
use serde_json::{Map, Value};
use tracing::debug;

use super::{LookupError, LookupResult, ProfileClient};
use crate::config::LookupConfig;
use crate::error::ConfigError;

/// Profile client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ChesscomClient {
    client: Client,
    base_url: Url,
}

impl ChesscomClient {
    /// Creates a client for `base_url` that sends `user_agent` and gives up
    /// after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: Url, user_agent: &str, timeout: Duration) -> reqwest::Result<Self> {
        let client = Self::builder(user_agent, timeout).build()?;
        Ok(Self::from_parts(client, base_url))
    }

    /// Creates a client from the `lookup` configuration section.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    pub fn from_config(config: &LookupConfig) -> Result<Self, ConfigError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|e| ConfigError::ValidationError {
                message: format!("Invalid lookup.base_url '{}': {e}", config.base_url),
            })?;

        Self::new(base_url, &config.user_agent, config.timeout()).map_err(|e| {
            ConfigError::ValidationError {
                message: format!("Failed to build HTTP client: {e}"),
            }
        })
    }

    /// Wraps an already configured `reqwest` client.
    #[must_use]
    pub const fn from_parts(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Returns a client builder with the user agent and timeout applied.
    #[must_use]
    pub fn builder(user_agent: &str, timeout: Duration) -> ClientBuilder {
        Client::builder().user_agent(user_agent).timeout(timeout)
    }

    /// Builds the profile URL, escaping `username` as a single path segment.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Transport`] if the base URL cannot carry a path.
    pub fn profile_url(&self, username: &str) -> LookupResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                LookupError::Transport(format!("base URL '{}' cannot carry a path", self.base_url))
            })?;
            segments.pop_if_empty().extend(["pub", "player", username]);
        }
        Ok(url)
    }
}

#[async_trait]
impl ProfileClient for ChesscomClient {
    async fn fetch_profile(&self, username: &str) -> LookupResult<Map<String, Value>> {
        let url = self.profile_url(username)?;
        debug!(%url, "Requesting player profile");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        match body {
            Value::Object(profile) if profile.is_empty() => Err(LookupError::NotFound),
            Value::Object(profile) => Ok(profile),
            other => Err(LookupError::Decode(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
