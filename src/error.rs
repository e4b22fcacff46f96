//! Error types for echoserver-mcp.
//!
//! - [`ConfigError`]: loading and validating the configuration file
//! - [`ToolError`]: the outcome of a failed tool invocation, mapped onto
//!   JSON-RPC error codes by the dispatcher
//!
//! Profile lookup failures have their own type in
//! [`crate::chesscom::LookupError`].

use std::path::PathBuf;

use thiserror::Error;

use crate::mcp::protocol::ErrorCode;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}

/// Errors produced while invoking a tool.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// Tool-specific unsuccessful outcome (e.g. no profile data).
    #[error("{0}")]
    Domain(String),

    /// The arguments do not satisfy the tool's input schema.
    #[error("{0}")]
    InvalidArguments(String),

    /// Any other failure while producing the result.
    #[error("{0}")]
    Internal(String),
}

impl ToolError {
    /// Returns the JSON-RPC error code this error is reported with.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Domain(_) => ErrorCode::ToolFailure,
            Self::InvalidArguments(_) => ErrorCode::InvalidParams,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }
}
