//! Scalar field access on a parsed item object.
//!
//! Missing or mistyped fields fall back to the zero value and log a warning.
//! Only a body that isn't a JSON object at all is an error.

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::FetchError;

pub type JsonObject = Map<String, Value>;

pub fn parse_object(raw: &[u8]) -> Result<JsonObject, FetchError> {
    let value: Value = serde_json::from_slice(raw)
        .map_err(|e| FetchError::decode(format!("invalid JSON: {e}")))?;
    match value {
        Value::Object(object) => Ok(object),
        Value::Null => Err(FetchError::decode("item does not exist (null body)")),
        other => Err(FetchError::decode(format!(
            "expected a JSON object, found {}",
            type_name(&other)
        ))),
    }
}

pub fn extract_string(field: &str, object: &JsonObject) -> String {
    match object.get(field) {
        Some(Value::String(s)) => s.clone(),
        other => {
            report(field, "string", other);
            String::new()
        }
    }
}

pub fn extract_i64(field: &str, object: &JsonObject) -> i64 {
    match object.get(field).and_then(Value::as_i64) {
        Some(n) => n,
        None => {
            report(field, "integer", object.get(field));
            0
        }
    }
}

pub fn extract_i32(field: &str, object: &JsonObject) -> i32 {
    match object
        .get(field)
        .and_then(Value::as_i64)
        .and_then(|n| i32::try_from(n).ok())
    {
        Some(n) => n,
        None => {
            report(field, "32-bit integer", object.get(field));
            0
        }
    }
}

pub fn extract_u64(field: &str, object: &JsonObject) -> u64 {
    match object.get(field).and_then(Value::as_u64) {
        Some(n) => n,
        None => {
            report(field, "unsigned integer", object.get(field));
            0
        }
    }
}

fn report(field: &str, expected: &str, found: Option<&Value>) {
    match found {
        None => warn!(field, "json object does not contain key"),
        Some(value) => warn!(
            field,
            expected,
            found = type_name(value),
            "json field has unexpected type"
        ),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
