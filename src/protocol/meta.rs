use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Plugin metadata advertised by `get_meta`. Immutable for the process
/// lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginMeta {
    pub name: String,
    pub version: String,
    pub language: String,
    pub capabilities: Vec<String>,
}

impl PluginMeta {
    /// Whether this plugin advertises `tool` as a capability.
    pub fn provides(&self, tool: &str) -> bool {
        self.capabilities.iter().any(|c| c == tool)
    }

    /// Lenient host-side decode of a `get_meta` result.
    ///
    /// Missing fields fall back to defaults (the configured plugin id for
    /// the name) so a sparse plugin still registers.
    pub fn from_value(value: &Value, fallback_name: &str) -> Self {
        let field = |key: &str, default: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or(default)
                .to_string()
        };
        Self {
            name: field("name", fallback_name),
            version: field("version", "0.0.0"),
            language: field("language", "unknown"),
            capabilities: value
                .get("capabilities")
                .and_then(Value::as_array)
                .map(|caps| {
                    caps.iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}
