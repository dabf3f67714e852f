use serde_json::{Map, Value};

use crate::registry::ToolError;

/// Handle a `string.reverse` invocation.
///
/// Reverses `args.text` by Unicode scalar value (`char`), so multi-byte
/// sequences and surrogate pairs survive a round trip; combining marks are
/// reordered relative to their base character. Reversal is an involution.
///
/// Argument coercion: absent or null `text` is the empty string; numbers
/// and booleans use their JSON rendering; arrays and objects are rejected.
pub fn handle(args: &Map<String, Value>) -> Result<Value, ToolError> {
    let text = match args.get("text") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => {
            return Err(ToolError::InvalidArgs {
                tool: "string.reverse".into(),
                detail: format!("text must be a scalar, got {}", json_type_name(other)),
            });
        }
    };
    Ok(Value::String(text.chars().rev().collect()))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
