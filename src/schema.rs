use jsonschema::validator_for;
use serde_json::Value;

/// Frozen schema for the response envelope (draft 2020-12).
pub const RESPONSE_SCHEMA: &str = r#"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "$id": "https://plugrpc.dev/schemas/response-v1.json",
  "title": "Plugin Response v1",
  "type": "object",
  "required": ["jsonrpc", "id"],
  "additionalProperties": false,
  "properties": {
    "jsonrpc": { "const": "2.0" },
    "id": {},
    "result": {},
    "error": {
      "type": "object",
      "required": ["message"],
      "additionalProperties": false,
      "properties": {
        "message": { "type": "string" }
      }
    }
  },
  "oneOf": [
    { "required": ["result"] },
    { "required": ["error"] }
  ]
}"#;

/// Frozen schema for the plugin metadata record (draft 2020-12).
pub const PLUGIN_META_SCHEMA: &str = r#"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "$id": "https://plugrpc.dev/schemas/plugin-meta-v1.json",
  "title": "Plugin Metadata v1",
  "type": "object",
  "required": ["name", "version", "language", "capabilities"],
  "additionalProperties": false,
  "properties": {
    "name": { "type": "string", "minLength": 1 },
    "version": { "type": "string", "minLength": 1 },
    "language": { "type": "string", "minLength": 1 },
    "capabilities": {
      "type": "array",
      "items": { "type": "string" },
      "uniqueItems": true
    }
  }
}"#;

#[derive(Debug, thiserror::Error)]
pub enum SchemaValidationError {
    #[error("Schema parse error: {0}")]
    SchemaParse(#[from] serde_json::Error),
    #[error("Schema compile error: {0}")]
    SchemaCompile(String),
    #[error("Instance does not satisfy schema: {0}")]
    ValidationFailed(String),
}

/// Validate a serialized response envelope against the frozen schema.
pub fn validate_response(instance_str: &str) -> Result<(), SchemaValidationError> {
    validate(RESPONSE_SCHEMA, instance_str)
}

/// Validate a serialized metadata record against the frozen schema.
pub fn validate_meta(instance_str: &str) -> Result<(), SchemaValidationError> {
    validate(PLUGIN_META_SCHEMA, instance_str)
}

/// Compile one of the frozen schemas and check an instance against it,
/// reporting the first violation.
fn validate(schema_str: &str, instance_str: &str) -> Result<(), SchemaValidationError> {
    let schema: Value = serde_json::from_str(schema_str)?;
    let instance: Value = serde_json::from_str(instance_str)?;

    let validator =
        validator_for(&schema).map_err(|e| SchemaValidationError::SchemaCompile(e.to_string()))?;

    let result = match validator.iter_errors(&instance).next() {
        None => Ok(()),
        Some(violation) => Err(SchemaValidationError::ValidationFailed(
            violation.to_string(),
        )),
    };
    result
}
