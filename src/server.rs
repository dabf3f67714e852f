use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::handlers;
use crate::protocol::{PluginMeta, Request, Response};
use crate::registry::ToolRegistry;

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("response serialization error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Plugin server: owns the read-eval-respond loop over a line-oriented
/// transport.
///
/// Strictly sequential — one line is fully parsed, dispatched, and
/// responded to before the next is read. Lines that are not valid JSON are
/// dropped without a response; every line that parses gets exactly one.
pub struct PluginServer {
    meta: PluginMeta,
    registry: ToolRegistry,
}

impl PluginServer {
    pub fn new(meta: PluginMeta, registry: ToolRegistry) -> Self {
        Self { meta, registry }
    }

    /// The server shipped in the `plugrpc-basic` binary.
    pub fn builtin() -> Self {
        let registry = ToolRegistry::builtin();
        let meta = handlers::builtin_meta(&registry);
        Self::new(meta, registry)
    }

    pub fn meta(&self) -> &PluginMeta {
        &self.meta
    }

    /// Serve requests from `reader` until `shutdown` or EOF.
    ///
    /// Generic over the transport so tests can drive it with in-memory
    /// buffers; [`PluginServer::run_stdio`] wires real stdin/stdout.
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> Result<(), ServeError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut reader = BufReader::new(reader);
        let mut raw = Vec::new();

        loop {
            raw.clear();
            let n = reader.read_until(b'\n', &mut raw).await?;
            if n == 0 {
                break;
            }

            let trimmed = match std::str::from_utf8(&raw) {
                Ok(s) => s.trim(),
                Err(_) => continue,
            };
            if trimmed.is_empty() {
                continue;
            }

            // Malformed lines are dropped silently, per the transport
            // contract. Callers must not rely on an error response here.
            let value: serde_json::Value = match serde_json::from_str(trimmed) {
                Ok(v) => v,
                Err(_) => continue,
            };

            let req = Request::from_value(&value);
            let outcome = handlers::dispatch(&req, &self.meta, &self.registry);
            write_response(&mut writer, outcome.response()).await?;

            // The shutdown ack is written before the loop ends; no further
            // input is processed.
            if outcome.stops_serving() {
                break;
            }
        }

        Ok(())
    }

    pub async fn run_stdio(&self) -> Result<(), ServeError> {
        self.run(tokio::io::stdin(), tokio::io::stdout()).await
    }
}

async fn write_response<W>(writer: &mut W, resp: &Response) -> Result<(), ServeError>
where
    W: AsyncWrite + Unpin,
{
    let out = serde_json::to_string(resp)?;
    writer.write_all(out.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
