//! Tool execution.
//!
//! [`ToolInvoker`] runs a registered tool against its arguments and returns
//! either a [`ToolCallResult`] or a [`ToolError`]. Arguments are checked
//! against the tool's declared schema before the tool runs.
//!
//! Profile lookups are bounded by a timeout here as well as in the HTTP
//! client, so no [`ProfileClient`] can stall the session.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::chesscom::{self, LookupError, ProfileClient};
use crate::error::ToolError;
use crate::mcp::registry::{ToolKind, ToolSpec};

/// Message reported for every failed profile lookup.
pub const PROFILE_NOT_FOUND: &str = "Chess.com user profile not found";

/// Content item in a tool call response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

/// Result of a tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolCallResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
}

impl ToolCallResult {
    /// Creates a single-item text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
        }
    }
}

/// Executes tools.
#[derive(Clone)]
pub struct ToolInvoker {
    profiles: Arc<dyn ProfileClient>,
    lookup_timeout: Duration,
}

impl ToolInvoker {
    /// Creates an invoker that fetches profiles through `profiles`, giving up
    /// after `lookup_timeout`.
    #[must_use]
    pub fn new(profiles: Arc<dyn ProfileClient>, lookup_timeout: Duration) -> Self {
        Self {
            profiles,
            lookup_timeout,
        }
    }

    /// Runs `tool` with `arguments`.
    ///
    /// # Errors
    ///
    /// - [`ToolError::InvalidArguments`] if a required argument is missing or
    ///   has the wrong type
    /// - [`ToolError::Domain`] if the tool ran but found nothing
    /// - [`ToolError::Internal`] if the tool's collaborator returned an
    ///   unexpected shape
    pub async fn invoke(
        &self,
        tool: &ToolSpec,
        arguments: &Map<String, Value>,
    ) -> Result<ToolCallResult, ToolError> {
        validate_arguments(tool, arguments)?;
        debug!(tool = %tool.name, "Invoking tool");

        match tool.kind {
            ToolKind::Echo => Self::echo(arguments),
            ToolKind::ProfileFollowers => self.profile_followers(arguments).await,
        }
    }

    fn echo(arguments: &Map<String, Value>) -> Result<ToolCallResult, ToolError> {
        let msg = string_argument(arguments, "msg")?;
        Ok(ToolCallResult::text(msg))
    }

    async fn profile_followers(
        &self,
        arguments: &Map<String, Value>,
    ) -> Result<ToolCallResult, ToolError> {
        let username = string_argument(arguments, "username")?;
        if !chesscom::is_valid_username(username) {
            return Err(ToolError::InvalidArguments(format!(
                "invalid Chess.com username '{username}': expected 1-{} letters, digits, '_' or '-'",
                chesscom::MAX_USERNAME_LEN
            )));
        }

        let lookup = self.profiles.fetch_profile(username);
        let outcome = tokio::time::timeout(self.lookup_timeout, lookup)
            .await
            .unwrap_or(Err(LookupError::Timeout));

        let profile = match outcome {
            Ok(profile) => profile,
            Err(error) => {
                warn!(username, %error, "Profile lookup failed");
                return Err(ToolError::Domain(PROFILE_NOT_FOUND.to_string()));
            }
        };

        let followers = profile.get("followers").ok_or_else(|| {
            ToolError::Internal("profile response has no 'followers' field".to_string())
        })?;

        Ok(ToolCallResult::text(display_value(followers)))
    }
}

/// Checks `arguments` against the tool's required parameters and their types.
fn validate_arguments(tool: &ToolSpec, arguments: &Map<String, Value>) -> Result<(), ToolError> {
    let schema = &tool.input_schema;
    for name in &schema.required {
        let Some(value) = arguments.get(name) else {
            return Err(ToolError::InvalidArguments(format!(
                "missing required argument '{name}'"
            )));
        };

        let expected = schema.properties.get(name).map(|p| p.kind.as_str());
        if expected == Some("string") && !value.is_string() {
            return Err(ToolError::InvalidArguments(format!(
                "argument '{name}' must be a string"
            )));
        }
    }
    Ok(())
}

fn string_argument<'a>(arguments: &'a Map<String, Value>, name: &str) -> Result<&'a str, ToolError> {
    arguments
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| ToolError::InvalidArguments(format!("argument '{name}' must be a string")))
}

/// Renders a JSON value as plain text: strings unquoted, everything else as JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
