//! Static catalog of the tools this server exposes.
//!
//! The registry is plain data: built once at startup, then shared read-only
//! (behind an `Arc`) by every request. [`ToolRegistry::list`] returns tools in
//! declaration order, so `tools/list` output is stable for the life of the
//! process.

use indexmap::IndexMap;
use serde::Serialize;

/// Name of the echo tool.
pub const ECHO_TOOL: &str = "echoserver";

/// Name of the Chess.com follower-count tool.
pub const PROFILE_FOLLOWERS_TOOL: &str = "chesscomProfileFollowers";

/// Which implementation backs a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    /// Returns `msg` unchanged.
    Echo,
    /// Looks up a Chess.com profile and returns its follower count.
    ProfileFollowers,
}

/// Schema of a single input property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertySchema {
    /// JSON type name, e.g. `"string"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable description.
    pub description: String,
}

/// JSON Schema for a tool's input parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputSchema {
    /// Always `"object"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Declared parameters, in declaration order.
    pub properties: IndexMap<String, PropertySchema>,
    /// Names of required parameters.
    pub required: Vec<String>,
}

impl Default for InputSchema {
    fn default() -> Self {
        Self {
            kind: "object".to_string(),
            properties: IndexMap::new(),
            required: Vec::new(),
        }
    }
}

/// A tool definition as advertised by `tools/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSpec {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: InputSchema,
    /// Implementation behind the tool. Not part of the wire format.
    #[serde(skip)]
    pub kind: ToolKind,
}

impl ToolSpec {
    /// Creates a tool with no parameters.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, kind: ToolKind) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: InputSchema::default(),
            kind,
        }
    }

    /// Adds a required string parameter.
    #[must_use]
    pub fn with_required_string(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let name = name.into();
        self.input_schema.properties.insert(
            name.clone(),
            PropertySchema {
                kind: "string".to_string(),
                description: description.into(),
            },
        );
        self.input_schema.required.push(name);
        self
    }
}

/// Ordered, immutable set of tools.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolSpec>,
}

impl ToolRegistry {
    /// Creates a registry from `tools`, keeping their order.
    ///
    /// Later duplicates of a name are dropped so names stay unique.
    #[must_use]
    pub fn new(tools: impl IntoIterator<Item = ToolSpec>) -> Self {
        let mut unique: Vec<ToolSpec> = Vec::new();
        for tool in tools {
            if unique.iter().any(|t| t.name == tool.name) {
                tracing::warn!(tool = %tool.name, "Duplicate tool name ignored");
                continue;
            }
            unique.push(tool);
        }
        Self { tools: unique }
    }

    /// Returns the built-in catalog: the echo tool, then the follower lookup.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new([
            ToolSpec::new(
                ECHO_TOOL,
                "Reply to a message with its echo (the message itself)",
                ToolKind::Echo,
            )
            .with_required_string("msg", "Message to reply"),
            ToolSpec::new(
                PROFILE_FOLLOWERS_TOOL,
                "Get a chess.com player followers",
                ToolKind::ProfileFollowers,
            )
            .with_required_string("username", "Chess.com username"),
        ])
    }

    /// Returns every tool in declaration order.
    #[must_use]
    pub fn list(&self) -> &[ToolSpec] {
        &self.tools
    }

    /// Looks up a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.iter().find(|t| t.name == name)
    }
}
