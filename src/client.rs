use std::process::Stdio;
use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

use crate::protocol::PluginMeta;

/// Grace period for shutdown acknowledgement and child exit.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("failed to spawn plugin '{id}': {source}")]
    Spawn {
        id: String,
        #[source]
        source: std::io::Error,
    },
    #[error("plugin '{0}' stdio pipes unavailable")]
    Pipes(String),
    #[error("request encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("plugin '{id}' I/O error: {source}")]
    Io {
        id: String,
        #[source]
        source: std::io::Error,
    },
    #[error("plugin '{0}' timed out after {1:?}")]
    Timeout(String, Duration),
    #[error("plugin '{0}' terminated unexpectedly")]
    Terminated(String),
    #[error("plugin '{id}' returned an error: {message}")]
    Rpc { id: String, message: String },
}

/// Host-side handle to one running plugin process.
///
/// Requests go out with ids incrementing from 1; response lines are read
/// until one carries the matching id. Non-JSON lines and mismatched ids on
/// the plugin's stdout are skipped. Each call is bounded by the configured
/// per-request timeout.
pub struct PluginClient {
    id: String,
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    next_id: i64,
    timeout: Duration,
}

impl PluginClient {
    /// Spawn a plugin process with piped stdin/stdout. Stderr is inherited
    /// so plugin diagnostics surface on the host's stderr.
    pub async fn spawn(
        program: &str,
        args: &[String],
        id: &str,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let mut command = Command::new(program);
        command.args(args);
        command.stdin(Stdio::piped());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::inherit());
        command.kill_on_drop(true);

        let mut child = command.spawn().map_err(|e| ClientError::Spawn {
            id: id.to_string(),
            source: e,
        })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ClientError::Pipes(id.to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ClientError::Pipes(id.to_string()))?;

        Ok(Self {
            id: id.to_string(),
            child,
            stdin,
            stdout: BufReader::new(stdout),
            next_id: 1,
            timeout,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Send one request and wait for its response.
    pub async fn call(&mut self, method: &str, params: Value) -> Result<Value, ClientError> {
        let call_id = self.next_id;
        self.next_id += 1;

        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": call_id,
            "method": method,
            "params": params,
        });
        let mut line = serde_json::to_string(&request)?;
        line.push('\n');

        let timeout = self.timeout;
        tokio::time::timeout(timeout, self.exchange(call_id, line.as_bytes()))
            .await
            .map_err(|_| ClientError::Timeout(self.id.clone(), timeout))?
    }

    async fn exchange(&mut self, call_id: i64, line: &[u8]) -> Result<Value, ClientError> {
        self.stdin.write_all(line).await.map_err(|e| ClientError::Io {
            id: self.id.clone(),
            source: e,
        })?;
        self.stdin.flush().await.map_err(|e| ClientError::Io {
            id: self.id.clone(),
            source: e,
        })?;

        let mut buf = String::new();
        loop {
            buf.clear();
            let n = self
                .stdout
                .read_line(&mut buf)
                .await
                .map_err(|e| ClientError::Io {
                    id: self.id.clone(),
                    source: e,
                })?;
            if n == 0 {
                return Err(ClientError::Terminated(self.id.clone()));
            }

            let value: Value = match serde_json::from_str(buf.trim()) {
                Ok(v) => v,
                Err(_) => continue,
            };
            if value.get("id") != Some(&Value::from(call_id)) {
                continue;
            }

            if let Some(err) = value.get("error") {
                let message = err
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unspecified plugin error")
                    .to_string();
                return Err(ClientError::Rpc {
                    id: self.id.clone(),
                    message,
                });
            }
            return Ok(value.get("result").cloned().unwrap_or(Value::Null));
        }
    }

    /// Fetch and decode the plugin's metadata.
    pub async fn get_meta(&mut self) -> Result<PluginMeta, ClientError> {
        let value = self.call("get_meta", serde_json::json!({})).await?;
        Ok(PluginMeta::from_value(&value, &self.id))
    }

    /// Invoke a tool on the plugin.
    pub async fn invoke(&mut self, tool: &str, args: Value) -> Result<Value, ClientError> {
        self.call("invoke", serde_json::json!({ "tool": tool, "args": args }))
            .await
    }

    /// Best-effort graceful shutdown: ask the plugin to stop, close its
    /// stdin, wait briefly, and kill if it is still alive. Never fails.
    pub async fn shutdown(mut self) {
        let _ = tokio::time::timeout(SHUTDOWN_GRACE, self.call("shutdown", serde_json::json!({})))
            .await;

        let PluginClient {
            mut child, stdin, ..
        } = self;
        drop(stdin);
        if tokio::time::timeout(SHUTDOWN_GRACE, child.wait()).await.is_err() {
            let _ = child.kill().await;
        }
    }
}
