//! Model Context Protocol (MCP) server implementation.
//!
//! This module implements the subset of MCP needed to expose a fixed set of
//! tools. The server communicates over stdio transport using JSON-RPC 2.0
//! messages.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          MCP Server                          │
//! │                                                              │
//! │   ┌─────────────┐    ┌─────────────┐    ┌─────────────┐     │
//! │   │  Transport  │───▶│ Dispatcher  │───▶│   Invoker   │     │
//! │   │   (lines)   │    │ (lifecycle) │    │   (tools)   │     │
//! │   └─────────────┘    └─────────────┘    └─────────────┘     │
//! │                             │                  │             │
//! │                             ▼                  ▼             │
//! │                      ┌─────────────┐    ┌─────────────┐     │
//! │                      │  Registry   │    │  Chess.com  │     │
//! │                      │  (catalog)  │    │   client    │     │
//! │                      └─────────────┘    └─────────────┘     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Protocol Version
//!
//! This implementation targets MCP protocol version 2024-11-05.

pub mod dispatcher;
pub mod invoker;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod transport;

pub use dispatcher::Dispatcher;
pub use invoker::{ToolCallResult, ToolContent, ToolInvoker};
pub use protocol::{Envelope, JsonRpcError, JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION};
pub use registry::{ToolRegistry, ToolSpec};
pub use server::McpServer;
pub use transport::{LineTransport, StdioTransport};
