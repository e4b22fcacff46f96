//! JSON-RPC 2.0 message types for MCP protocol.
//!
//! This module defines the envelopes exchanged over the line transport.
//! Every inbound line carries one request; every request is answered with
//! exactly one [`Envelope`], either a [`JsonRpcResponse`] or a [`JsonRpcError`].
//!
//! # Request IDs
//!
//! The `id` is an opaque correlation token. It may be a number, a string or
//! `null`, and is echoed back verbatim. A line that cannot be decoded at all
//! is answered with `id: null`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// The MCP protocol version this implementation supports.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name for capability negotiation.
pub const SERVER_NAME: &str = "echoserver";

/// Server version reported in `serverInfo`.
pub const SERVER_VERSION: &str = "1.0.0";

/// The only JSON-RPC version accepted.
pub const JSONRPC_VERSION: &str = "2.0";

/// A JSON-RPC 2.0 request ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric request ID, integer or not.
    Number(Number),
    /// String request ID.
    String(String),
    /// Explicit or absent ID.
    Null,
}

impl RequestId {
    /// Reads an ID from a JSON value.
    ///
    /// Returns `None` for booleans, arrays and objects, which are not valid IDs.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::String(s) => Some(Self::String(s.clone())),
            Value::Null => Some(Self::Null),
            _ => None,
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Null => write!(f, "null"),
        }
    }
}

/// A JSON-RPC 2.0 request message.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcRequest {
    /// Request identifier, echoed in the response.
    pub id: RequestId,

    /// The method to invoke. Empty when the request carried no string method.
    pub method: String,

    /// Parameters for the method. `None` when absent or `null`.
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Reads a request out of a decoded JSON value.
    ///
    /// # Errors
    ///
    /// Returns an `Invalid Request` error if the value is not an object, the
    /// `id` is not a string, number or `null`, or `jsonrpc` is not `"2.0"`.
    pub fn from_value(value: &Value) -> Result<Self, JsonRpcError> {
        let obj = value
            .as_object()
            .ok_or_else(|| JsonRpcError::invalid_request(RequestId::Null))?;

        let id = match obj.get("id") {
            None => RequestId::Null,
            Some(raw) => {
                RequestId::from_value(raw).ok_or_else(|| JsonRpcError::invalid_request(RequestId::Null))?
            }
        };

        if obj.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
            return Err(JsonRpcError::invalid_request(id));
        }

        let method = obj
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let params = obj.get("params").filter(|p| !p.is_null()).cloned();

        Ok(Self { id, method, params })
    }

    /// Returns the params as an object, treating absent params as empty.
    ///
    /// # Errors
    ///
    /// Returns an `Internal error` if params are present but not an object.
    pub fn params_object(&self) -> Result<Map<String, Value>, JsonRpcError> {
        match &self.params {
            None => Ok(Map::new()),
            Some(Value::Object(map)) => Ok(map.clone()),
            Some(_) => Err(JsonRpcError::internal_error(
                self.id.clone(),
                format!("params for '{}' must be an object", self.method),
            )),
        }
    }
}

/// A successful JSON-RPC 2.0 response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Always "2.0".
    pub jsonrpc: String,

    /// The request ID this response corresponds to.
    pub id: RequestId,

    /// The result of the method call.
    pub result: Value,
}

impl JsonRpcResponse {
    /// Creates a new success response.
    #[must_use]
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result,
        }
    }
}

/// JSON-RPC 2.0 error codes used by this server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid JSON was received by the server.
    ParseError,
    /// The JSON sent is not a valid Request object.
    InvalidRequest,
    /// The method, or the named tool, does not exist.
    MethodNotFound,
    /// Invalid method parameters.
    InvalidParams,
    /// Internal JSON-RPC error.
    InternalError,
    /// A tool ran but could not produce a result.
    ToolFailure,
}

impl ErrorCode {
    /// Returns the numeric code for this error.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
            Self::ToolFailure => -1,
        }
    }

    /// Returns the default message for this error code.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::ParseError => "Parse error",
            Self::InvalidRequest => "Invalid Request",
            Self::MethodNotFound => "method not found",
            Self::InvalidParams => "Invalid params",
            Self::InternalError => "Internal error",
            Self::ToolFailure => "Tool failure",
        }
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorData {
    /// The error code.
    pub code: i32,

    /// A short description of the error.
    pub message: String,

    /// Additional information about the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcErrorData {
    /// Creates a new error from an error code.
    #[must_use]
    pub fn from_code(code: ErrorCode) -> Self {
        Self::with_message(code, code.default_message())
    }

    /// Creates a new error with a custom message.
    #[must_use]
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            message: message.into(),
            data: None,
        }
    }
}

/// A JSON-RPC 2.0 error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Always "2.0".
    pub jsonrpc: String,

    /// The request ID this error corresponds to; `null` if it is unknown.
    pub id: RequestId,

    /// The error details.
    pub error: JsonRpcErrorData,
}

impl JsonRpcError {
    /// Creates a new error response.
    #[must_use]
    pub fn new(id: RequestId, error: JsonRpcErrorData) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            error,
        }
    }

    /// Creates a parse error response (ID cannot be determined).
    #[must_use]
    pub fn parse_error() -> Self {
        Self::new(RequestId::Null, JsonRpcErrorData::from_code(ErrorCode::ParseError))
    }

    /// Creates an invalid request error response.
    #[must_use]
    pub fn invalid_request(id: RequestId) -> Self {
        Self::new(id, JsonRpcErrorData::from_code(ErrorCode::InvalidRequest))
    }

    /// Creates a method not found error response.
    #[must_use]
    pub fn method_not_found(id: RequestId) -> Self {
        Self::new(id, JsonRpcErrorData::from_code(ErrorCode::MethodNotFound))
    }

    /// Creates the error response for a `tools/call` naming an unknown tool.
    #[must_use]
    pub fn tool_not_found(id: RequestId) -> Self {
        Self::new(
            id,
            JsonRpcErrorData::with_message(ErrorCode::MethodNotFound, "tool not found"),
        )
    }

    /// Creates an invalid params error response.
    #[must_use]
    pub fn invalid_params(id: RequestId, message: impl Into<String>) -> Self {
        Self::new(
            id,
            JsonRpcErrorData::with_message(ErrorCode::InvalidParams, message),
        )
    }

    /// Creates an internal error response.
    #[must_use]
    pub fn internal_error(id: RequestId, message: impl Into<String>) -> Self {
        Self::new(
            id,
            JsonRpcErrorData::with_message(ErrorCode::InternalError, message),
        )
    }
}

/// One outbound line: a success or an error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Envelope {
    /// A success response carrying `result`.
    Response(JsonRpcResponse),
    /// An error response carrying `error`.
    Error(JsonRpcError),
}

impl Envelope {
    /// Returns the ID this envelope answers.
    #[must_use]
    pub const fn id(&self) -> &RequestId {
        match self {
            Self::Response(resp) => &resp.id,
            Self::Error(err) => &err.id,
        }
    }

    /// Returns the error details if this is an error response.
    #[must_use]
    pub const fn error(&self) -> Option<&JsonRpcErrorData> {
        match self {
            Self::Response(_) => None,
            Self::Error(err) => Some(&err.error),
        }
    }

    /// Returns the result if this is a success response.
    #[must_use]
    pub const fn result(&self) -> Option<&Value> {
        match self {
            Self::Response(resp) => Some(&resp.result),
            Self::Error(_) => None,
        }
    }
}

impl From<JsonRpcResponse> for Envelope {
    fn from(resp: JsonRpcResponse) -> Self {
        Self::Response(resp)
    }
}

impl From<JsonRpcError> for Envelope {
    fn from(err: JsonRpcError) -> Self {
        Self::Error(err)
    }
}

/// Decodes one inbound line into a JSON object.
///
/// Anything that is not a JSON object is a parse error: without an object
/// there is no `id` to answer.
///
/// # Errors
///
/// Returns a `Parse error` response with `id: null`.
pub fn parse_message(json: &str) -> Result<Value, JsonRpcError> {
    let value: Value = serde_json::from_str(json).map_err(|_| JsonRpcError::parse_error())?;

    if !value.is_object() {
        return Err(JsonRpcError::parse_error());
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_valid_request() {
        let json = r#"{"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}"#;
        let value = parse_message(json).unwrap();
        let req = JsonRpcRequest::from_value(&value).unwrap();

        assert_eq!(req.id, RequestId::from(1));
        assert_eq!(req.method, "initialize");
        assert_eq!(req.params, Some(json!({})));
    }

    #[test]
    fn parse_string_id() {
        let value = json!({"jsonrpc": "2.0", "id": "abc-123", "method": "test"});
        let req = JsonRpcRequest::from_value(&value).unwrap();
        assert_eq!(req.id, RequestId::from("abc-123"));
    }

    #[test]
    fn parse_null_and_missing_id() {
        let value = json!({"jsonrpc": "2.0", "id": null, "method": "test"});
        assert_eq!(JsonRpcRequest::from_value(&value).unwrap().id, RequestId::Null);

        let value = json!({"jsonrpc": "2.0", "method": "test"});
        assert_eq!(JsonRpcRequest::from_value(&value).unwrap().id, RequestId::Null);
    }

    #[test]
    fn fractional_id_echoed_verbatim() {
        let value = json!({"jsonrpc": "2.0", "id": 1.5, "method": "test"});
        let req = JsonRpcRequest::from_value(&value).unwrap();
        let response = JsonRpcResponse::success(req.id, json!({}));
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""id":1.5"#));
    }

    #[test]
    fn parse_invalid_json() {
        let err = parse_message("not valid json").unwrap_err();
        assert_eq!(err.error.code, ErrorCode::ParseError.code());
        assert_eq!(err.id, RequestId::Null);
    }

    #[test]
    fn parse_non_object_json() {
        for line in ["[1, 2]", "42", "\"text\"", "null"] {
            let err = parse_message(line).unwrap_err();
            assert_eq!(err.error.code, ErrorCode::ParseError.code(), "line: {line}");
        }
    }

    #[test]
    fn missing_jsonrpc_is_invalid_request() {
        let value = json!({"id": 1, "method": "test"});
        let err = JsonRpcRequest::from_value(&value).unwrap_err();
        assert_eq!(err.error.code, ErrorCode::InvalidRequest.code());
        assert_eq!(err.id, RequestId::from(1));
    }

    #[test]
    fn wrong_jsonrpc_version_is_invalid_request() {
        let value = json!({"jsonrpc": "1.0", "id": 7, "method": "test"});
        let err = JsonRpcRequest::from_value(&value).unwrap_err();
        assert_eq!(err.error.code, ErrorCode::InvalidRequest.code());
        assert_eq!(err.id, RequestId::from(7));
    }

    #[test]
    fn object_id_is_invalid_request() {
        let value = json!({"jsonrpc": "2.0", "id": {"a": 1}, "method": "test"});
        let err = JsonRpcRequest::from_value(&value).unwrap_err();
        assert_eq!(err.error.code, ErrorCode::InvalidRequest.code());
        assert_eq!(err.id, RequestId::Null);
    }

    #[test]
    fn missing_method_is_empty() {
        let value = json!({"jsonrpc": "2.0", "id": 1});
        assert_eq!(JsonRpcRequest::from_value(&value).unwrap().method, "");
    }

    #[test]
    fn params_object_defaults_to_empty() {
        let value = json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": null});
        let req = JsonRpcRequest::from_value(&value).unwrap();
        assert!(req.params_object().unwrap().is_empty());
    }

    #[test]
    fn params_object_rejects_arrays() {
        let value = json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": [1]});
        let req = JsonRpcRequest::from_value(&value).unwrap();
        let err = req.params_object().unwrap_err();
        assert_eq!(err.error.code, ErrorCode::InternalError.code());
    }

    #[test]
    fn serialise_success_response() {
        let response = JsonRpcResponse::success(RequestId::from(1), json!({"ok": true}));
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""jsonrpc":"2.0""#));
        assert!(json.contains(r#""id":1"#));
        assert!(json.contains(r#""result":{"ok":true}"#));
    }

    #[test]
    fn serialise_error_response() {
        let error = JsonRpcError::method_not_found(RequestId::from(1));
        let value = serde_json::to_value(&error).unwrap();
        assert_eq!(
            value,
            json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32601, "message": "method not found"}})
        );
    }

    #[test]
    fn parse_error_serialises_null_id() {
        let value = serde_json::to_value(JsonRpcError::parse_error()).unwrap();
        assert_eq!(
            value,
            json!({"jsonrpc": "2.0", "id": null, "error": {"code": -32700, "message": "Parse error"}})
        );
    }

    #[test]
    fn envelope_accessors() {
        let ok: Envelope = JsonRpcResponse::success(RequestId::from(3), json!({})).into();
        assert_eq!(ok.id(), &RequestId::from(3));
        assert!(ok.error().is_none());
        assert!(ok.result().is_some());

        let err: Envelope = JsonRpcError::tool_not_found(RequestId::from("x")).into();
        assert_eq!(err.id(), &RequestId::from("x"));
        assert_eq!(err.error().unwrap().message, "tool not found");
        assert!(err.result().is_none());
    }

    #[test]
    fn request_id_display() {
        assert_eq!(format!("{}", RequestId::from(42)), "42");
        assert_eq!(format!("{}", RequestId::from("abc")), "abc");
        assert_eq!(format!("{}", RequestId::Null), "null");
    }
}
