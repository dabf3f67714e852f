use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::handlers::string_reverse;

/// A tool implementation: a pure function from arguments to a JSON result.
pub type ToolFn = fn(&Map<String, Value>) -> Result<Value, ToolError>;

/// Typed outcome of a failed tool invocation. Surfaced to the wire as the
/// error message, never as a process fault.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    Unknown(String),
    #[error("Invalid arguments for {tool}: {detail}")]
    InvalidArgs { tool: String, detail: String },
    #[error("{0}")]
    Failed(String),
}

/// Immutable capability-to-function mapping, constructed once at startup
/// and passed into the server. Keys are iterated in sorted order so the
/// advertised capability list is deterministic.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, ToolFn>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shipped with the builtin plugin: `string.reverse` only.
    pub fn builtin() -> Self {
        Self::new().with_tool("string.reverse", string_reverse::handle)
    }

    pub fn with_tool(mut self, name: impl Into<String>, tool: ToolFn) -> Self {
        self.tools.insert(name.into(), tool);
        self
    }

    /// Look up `tool` and run it. The single dispatch point for tool names.
    pub fn invoke(&self, tool: &str, args: &Map<String, Value>) -> Result<Value, ToolError> {
        match self.tools.get(tool) {
            Some(f) => f(args),
            None => Err(ToolError::Unknown(tool.to_string())),
        }
    }

    /// Capability names in sorted order.
    pub fn capabilities(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }
}
