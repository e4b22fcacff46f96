//! Error types for Chess.com profile lookups.

use thiserror::Error;

/// Result type for profile lookups.
pub type LookupResult<T> = Result<T, LookupError>;

/// Why a profile lookup produced no data.
///
/// Callers outside this module see every variant as the same "profile not
/// found" outcome; the variants exist so the precise cause can be logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The request did not complete within the configured timeout.
    #[error("profile request timed out")]
    Timeout,

    /// The API answered with a non-success status.
    #[error("profile request returned HTTP {0}")]
    HttpStatus(u16),

    /// The response body was not a JSON object.
    #[error("profile response could not be decoded: {0}")]
    Decode(String),

    /// The request failed before a response was received.
    #[error("profile request failed: {0}")]
    Transport(String),

    /// The API answered with an empty profile.
    #[error("profile response was empty")]
    NotFound,
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if let Some(status) = e.status() {
            Self::HttpStatus(status.as_u16())
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}
