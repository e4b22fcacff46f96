//! Request routing.
//!
//! The [`Dispatcher`] turns one decoded request into exactly one
//! [`Envelope`]. It never fails: every problem, from an unknown method to a
//! tool that found nothing, becomes an error envelope carrying the request's
//! `id`.
//!
//! Routing is table-driven. Adding a method means adding a row to
//! [`METHODS`] and a [`Method`] variant.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::mcp::invoker::ToolInvoker;
use crate::mcp::protocol::{
    Envelope, JsonRpcError, JsonRpcErrorData, JsonRpcRequest, JsonRpcResponse,
    MCP_PROTOCOL_VERSION, SERVER_NAME, SERVER_VERSION,
};
use crate::mcp::registry::ToolRegistry;

/// Protocol methods this server answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Handshake.
    Initialize,
    /// Capability discovery.
    ToolsList,
    /// Tool invocation.
    ToolsCall,
}

/// Method name to [`Method`] lookup table.
pub const METHODS: &[(&str, Method)] = &[
    ("initialize", Method::Initialize),
    ("tools/list", Method::ToolsList),
    ("tools/call", Method::ToolsCall),
];

impl Method {
    /// Resolves a method name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        METHODS
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|&(_, method)| method)
    }
}

/// Server capabilities advertised during initialisation.
#[derive(Debug, Clone, Serialize)]
pub struct ServerCapabilities {
    /// Tool-related capabilities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolCapabilities>,
}

impl Default for ServerCapabilities {
    fn default() -> Self {
        Self {
            tools: Some(ToolCapabilities::default()),
        }
    }
}

/// Tool-specific capabilities.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolCapabilities {
    /// Whether the tool list can change during the session.
    #[serde(rename = "listChanged", skip_serializing_if = "is_false")]
    pub list_changed: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's skip_serializing_if requires a predicate fn(&T) -> bool, so we must take &bool here
const fn is_false(b: &bool) -> bool {
    !*b
}

/// Server information for initialisation response.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: SERVER_VERSION.to_string(),
        }
    }
}

/// Routes requests to lifecycle handlers or the tool invoker.
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    invoker: ToolInvoker,
}

impl Dispatcher {
    /// Creates a dispatcher over `registry`, running tools with `invoker`.
    #[must_use]
    pub const fn new(registry: Arc<ToolRegistry>, invoker: ToolInvoker) -> Self {
        Self { registry, invoker }
    }

    /// Returns the tool registry.
    #[must_use]
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Handles one decoded request and produces its envelope.
    pub async fn handle(&self, message: &Value) -> Envelope {
        let request = match JsonRpcRequest::from_value(message) {
            Ok(request) => request,
            Err(error) => {
                debug!(code = error.error.code, "Rejected malformed request");
                return error.into();
            }
        };

        debug!(id = %request.id, method = %request.method, "Handling request");

        let outcome = match Method::from_name(&request.method) {
            Some(Method::Initialize) => Self::handle_initialize(&request),
            Some(Method::ToolsList) => self.handle_tools_list(&request),
            Some(Method::ToolsCall) => self.handle_tools_call(&request).await,
            None => Err(JsonRpcError::method_not_found(request.id.clone())),
        };

        match outcome {
            Ok(response) => response.into(),
            Err(error) => {
                debug!(
                    id = %error.id,
                    code = error.error.code,
                    message = %error.error.message,
                    "Request failed"
                );
                error.into()
            }
        }
    }

    /// Handles the initialize request.
    fn handle_initialize(req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        // Content is ignored; only the shape is checked.
        req.params_object()?;

        let result = json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": ServerCapabilities::default(),
            "serverInfo": ServerInfo::default(),
        });

        Ok(JsonRpcResponse::success(req.id.clone(), result))
    }

    /// Handles the tools/list request.
    fn handle_tools_list(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        let result = json!({
            "tools": self.registry.list(),
        });

        Ok(JsonRpcResponse::success(req.id.clone(), result))
    }

    /// Handles the tools/call request.
    async fn handle_tools_call(
        &self,
        req: &JsonRpcRequest,
    ) -> Result<JsonRpcResponse, JsonRpcError> {
        let params = req.params_object()?;

        // A missing or non-string name matches no tool.
        let tool = params
            .get("name")
            .and_then(Value::as_str)
            .and_then(|name| self.registry.get(name))
            .ok_or_else(|| JsonRpcError::tool_not_found(req.id.clone()))?;

        let arguments = match params.get("arguments") {
            Some(Value::Object(arguments)) => arguments,
            Some(_) => {
                return Err(JsonRpcError::internal_error(
                    req.id.clone(),
                    "tools/call 'arguments' must be an object",
                ))
            }
            None => {
                return Err(JsonRpcError::internal_error(
                    req.id.clone(),
                    "tools/call params must include 'arguments'",
                ))
            }
        };

        let result = self.invoker.invoke(tool, arguments).await.map_err(|e| {
            JsonRpcError::new(
                req.id.clone(),
                JsonRpcErrorData::with_message(e.code(), e.to_string()),
            )
        })?;

        let result_value = serde_json::to_value(&result).map_err(|e| {
            tracing::error!(error = %e, "Failed to serialise tool call result");
            JsonRpcError::internal_error(
                req.id.clone(),
                "Internal error: failed to serialise result",
            )
        })?;

        Ok(JsonRpcResponse::success(req.id.clone(), result_value))
    }
}
