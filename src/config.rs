use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Default per-request timeout for plugin calls (30 seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("unsupported config version: {0} (expected 1)")]
    Version(u32),
    #[error("plugin id must not be empty")]
    EmptyId,
    #[error("duplicate plugin id '{0}'")]
    DuplicateId(String),
    #[error("plugin '{0}' has kind process but no command")]
    MissingCommand(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginKind {
    /// The sibling `plugrpc-basic` executable.
    Builtin,
    /// An arbitrary command line, e.g. `["node", "plugin.js", "--serve"]`.
    Process,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PluginEntry {
    pub id: String,
    pub kind: PluginKind,
    #[serde(default)]
    pub command: Vec<String>,
    /// Optional plugins that fail to start are skipped with a warning;
    /// required ones fail the whole host startup.
    #[serde(default)]
    pub optional: bool,
}

#[derive(Debug, Deserialize)]
struct HostConfigFile {
    version: u32,
    #[serde(default)]
    plugins: Vec<PluginEntry>,
    timeout_secs: Option<u64>,
}

/// Validated host configuration.
#[derive(Debug, Clone)]
pub struct HostConfig {
    pub plugins: Vec<PluginEntry>,
    pub timeout: Duration,
}

impl HostConfig {
    /// Load and validate a YAML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a YAML config document.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let parsed: HostConfigFile = serde_yaml::from_str(content)?;
        if parsed.version != 1 {
            return Err(ConfigError::Version(parsed.version));
        }

        let mut seen = HashSet::new();
        for entry in &parsed.plugins {
            if entry.id.trim().is_empty() {
                return Err(ConfigError::EmptyId);
            }
            if !seen.insert(entry.id.clone()) {
                return Err(ConfigError::DuplicateId(entry.id.clone()));
            }
            if entry.kind == PluginKind::Process && entry.command.is_empty() {
                return Err(ConfigError::MissingCommand(entry.id.clone()));
            }
        }

        Ok(Self {
            plugins: parsed.plugins,
            timeout: Duration::from_secs(parsed.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        })
    }

    /// The configuration used when no config file is given: a single
    /// required builtin plugin.
    pub fn default_builtin() -> Self {
        Self {
            plugins: vec![PluginEntry {
                id: "basic".into(),
                kind: PluginKind::Builtin,
                command: Vec::new(),
                optional: false,
            }],
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
