use std::time::Duration;

use serde_json::Value;

use crate::client::{ClientError, PluginClient};
use crate::config::{ConfigError, HostConfig, PluginEntry, PluginKind};
use crate::protocol::PluginMeta;

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot locate builtin plugin executable: {0}")]
    BuiltinPath(#[source] std::io::Error),
    #[error("plugin '{id}' failed to start: {source}")]
    PluginStart {
        id: String,
        #[source]
        source: ClientError,
    },
    #[error("no plugin provides tool '{0}'")]
    NoProvider(String),
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// A configured set of running plugins with capability-based routing.
///
/// Tool invocations go to the first plugin in configuration order whose
/// advertised capabilities contain the tool.
pub struct PluginHost {
    plugins: Vec<(PluginMeta, PluginClient)>,
}

impl PluginHost {
    /// Spawn every configured plugin and fetch its metadata.
    ///
    /// Failures of plugins marked `optional` are reported on stderr and
    /// skipped; a required plugin failing shuts down everything already
    /// started and fails `start`.
    pub async fn start(config: &HostConfig) -> Result<Self, HostError> {
        let mut plugins = Vec::new();
        for entry in &config.plugins {
            let (program, args) = resolve_command(entry)?;
            match connect(&program, &args, &entry.id, config.timeout).await {
                Ok(pair) => plugins.push(pair),
                Err(e) if entry.optional => {
                    eprintln!("plugrpc: skipping optional plugin '{}': {e}", entry.id);
                }
                Err(e) => {
                    Self { plugins }.shutdown().await;
                    return Err(HostError::PluginStart {
                        id: entry.id.clone(),
                        source: e,
                    });
                }
            }
        }
        Ok(Self { plugins })
    }

    /// Metadata of the running plugins, in configuration order.
    pub fn plugins(&self) -> impl Iterator<Item = &PluginMeta> {
        self.plugins.iter().map(|(meta, _)| meta)
    }

    /// Route one tool invocation to the first capable plugin.
    pub async fn invoke(&mut self, tool: &str, args: Value) -> Result<Value, HostError> {
        let slot = self
            .plugins
            .iter()
            .position(|(meta, _)| meta.provides(tool));
        match slot {
            Some(i) => Ok(self.plugins[i].1.invoke(tool, args).await?),
            None => Err(HostError::NoProvider(tool.to_string())),
        }
    }

    /// Best-effort shutdown of every plugin.
    pub async fn shutdown(self) {
        for (_, client) in self.plugins {
            client.shutdown().await;
        }
    }
}

async fn connect(
    program: &str,
    args: &[String],
    id: &str,
    timeout: Duration,
) -> Result<(PluginMeta, PluginClient), ClientError> {
    let mut client = PluginClient::spawn(program, args, id, timeout).await?;
    let meta = client.get_meta().await?;
    Ok((meta, client))
}

fn resolve_command(entry: &PluginEntry) -> Result<(String, Vec<String>), HostError> {
    match entry.kind {
        PluginKind::Builtin => {
            let exe = std::env::current_exe().map_err(HostError::BuiltinPath)?;
            let sibling =
                exe.with_file_name(format!("plugrpc-basic{}", std::env::consts::EXE_SUFFIX));
            Ok((
                sibling.to_string_lossy().into_owned(),
                vec!["--serve".to_string()],
            ))
        }
        // Validation guarantees a non-empty command for process plugins.
        PluginKind::Process => Ok((entry.command[0].clone(), entry.command[1..].to_vec())),
    }
}
