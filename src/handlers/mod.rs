pub mod string_reverse;

use serde_json::Value;

use crate::protocol::{InvokeParams, Method, PluginMeta, Request, Response};
use crate::registry::ToolRegistry;

/// Outcome of dispatching one request: the response to write, and whether
/// the serve loop should stop afterwards.
#[derive(Debug, Clone)]
pub enum Dispatch {
    Reply(Response),
    Stop(Response),
}

impl Dispatch {
    pub fn response(&self) -> &Response {
        match self {
            Dispatch::Reply(r) | Dispatch::Stop(r) => r,
        }
    }

    pub fn stops_serving(&self) -> bool {
        matches!(self, Dispatch::Stop(_))
    }
}

/// Dispatch a decoded request to its handler.
///
/// Total over decoded requests: every request yields exactly one response,
/// success or error. `shutdown` is the only method with a lifecycle side
/// effect, signalled through [`Dispatch::Stop`].
pub fn dispatch(req: &Request, meta: &PluginMeta, registry: &ToolRegistry) -> Dispatch {
    match req.method {
        Method::GetMeta => {
            let result =
                serde_json::to_value(meta).expect("PluginMeta must serialize to JSON Value");
            Dispatch::Reply(Response::success(req.id.clone(), result))
        }

        Method::Invoke => Dispatch::Reply(handle_invoke(req, registry)),

        Method::Shutdown => Dispatch::Stop(Response::success(req.id.clone(), Value::Bool(true))),

        Method::Unknown => Dispatch::Reply(Response::error(req.id.clone(), "Unknown method")),
    }
}

fn handle_invoke(req: &Request, registry: &ToolRegistry) -> Response {
    let params: InvokeParams = match &req.params {
        Some(v) => match serde_json::from_value(v.clone()) {
            Ok(p) => p,
            Err(e) => {
                return Response::error(req.id.clone(), format!("Invalid invoke params: {e}"));
            }
        },
        None => {
            return Response::error(req.id.clone(), "Missing params for invoke");
        }
    };

    match registry.invoke(&params.tool, &params.args) {
        Ok(result) => Response::success(req.id.clone(), result),
        Err(e) => Response::error(req.id.clone(), e.to_string()),
    }
}

/// Metadata for the builtin plugin binary, derived from the registry so the
/// advertised capabilities never drift from what is actually served.
pub fn builtin_meta(registry: &ToolRegistry) -> PluginMeta {
    PluginMeta {
        name: "plugrpc-basic".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        language: "rust".into(),
        capabilities: registry.capabilities(),
    }
}
