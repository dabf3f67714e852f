use serde::Deserialize;
use serde_json::Value;

/// Method name after parsing — a closed set with an explicit catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    GetMeta,
    Invoke,
    Shutdown,
    /// Any method name outside the known set. Dispatched to the
    /// `Unknown method` error rather than rejected at parse time.
    Unknown,
}

impl Method {
    pub fn from_name(name: &str) -> Self {
        match name {
            "get_meta" => Self::GetMeta,
            "invoke" => Self::Invoke,
            "shutdown" => Self::Shutdown,
            _ => Self::Unknown,
        }
    }
}

/// A decoded request line.
///
/// The id is any JSON value (including null) and is echoed verbatim into
/// the response. Ids are not required to be unique.
#[derive(Debug, Clone)]
pub struct Request {
    pub id: Value,
    pub method: Method,
    pub params: Option<Value>,
}

impl Request {
    /// Decode a parsed JSON line into a request.
    ///
    /// Decoding is total: a missing or wrong-typed `method` maps to
    /// [`Method::Unknown`] and a missing `id` to null, so every line that
    /// parses as JSON still receives exactly one response.
    pub fn from_value(value: &Value) -> Self {
        Self {
            id: value.get("id").cloned().unwrap_or(Value::Null),
            method: match value.get("method").and_then(Value::as_str) {
                Some(name) => Method::from_name(name),
                None => Method::Unknown,
            },
            params: value.get("params").cloned(),
        }
    }
}

/// Parameters for the `invoke` method.
#[derive(Debug, Clone, Deserialize)]
pub struct InvokeParams {
    pub tool: String,
    #[serde(default)]
    pub args: serde_json::Map<String, Value>,
}
