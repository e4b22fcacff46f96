//! echoserver-mcp: a line-delimited JSON-RPC server exposing two MCP tools
//!
//! The server reads one JSON-RPC request per line on stdin and writes one
//! response per line on stdout. It offers two tools:
//!
//! - **`echoserver`**: replies with the message it was given
//! - **`chesscomProfileFollowers`**: looks up a Chess.com player and returns
//!   their follower count
//!
//! A malformed line or a failed tool call produces an error response for
//! that request only. The session keeps going until the input closes.
//!
//! # Modules
//!
//! - [`config`] — Configuration loading and validation
//! - [`error`] — Error types
//! - [`mcp`] — MCP protocol implementation
//! - [`chesscom`] — Chess.com public API client

pub mod chesscom;
pub mod config;
pub mod error;
pub mod mcp;
