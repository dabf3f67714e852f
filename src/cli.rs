use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::config::HostConfig;
use crate::host::PluginHost;
use crate::protocol::PluginMeta;

#[derive(Parser)]
#[command(name = "plugrpc")]
#[command(author, version, about = "Host for line-delimited JSON-RPC plugins")]
pub struct Cli {
    /// Path to the host configuration file (YAML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List configured plugins and their advertised metadata
    ListPlugins,

    /// Invoke a tool on the first plugin that provides it
    Invoke {
        /// Tool name, e.g. string.reverse
        #[arg(long)]
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(long)]
        params: Option<String>,

        /// Shorthand for --params '{"text": "<s>"}'
        #[arg(long)]
        text: Option<String>,
    },
}

/// Run one host command. Plugins are always shut down before returning,
/// also on error.
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => HostConfig::load(path)?,
        None => HostConfig::default_builtin(),
    };

    let mut host = PluginHost::start(&config).await?;
    let outcome = execute(&mut host, &cli.command).await;
    host.shutdown().await;
    outcome
}

async fn execute(
    host: &mut PluginHost,
    command: &Commands,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::ListPlugins => {
            let metas: Vec<&PluginMeta> = host.plugins().collect();
            println!("{}", serde_json::to_string_pretty(&metas)?);
            Ok(())
        }

        Commands::Invoke { tool, params, text } => {
            let args = invoke_args(params.as_deref(), text.as_deref())?;
            let result = host.invoke(tool, args).await?;
            let wrapped = serde_json::json!({ "result": result });
            println!("{}", serde_json::to_string_pretty(&wrapped)?);
            Ok(())
        }
    }
}

/// Build the args object for `invoke`. `--params` wins when both flags are
/// given; neither flag means an empty object.
fn invoke_args(
    params: Option<&str>,
    text: Option<&str>,
) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(raw) = params {
        let value: Value = serde_json::from_str(raw)?;
        if !value.is_object() {
            return Err("--params must be a JSON object".into());
        }
        return Ok(value);
    }
    if let Some(s) = text {
        return Ok(serde_json::json!({ "text": s }));
    }
    Ok(serde_json::json!({}))
}
