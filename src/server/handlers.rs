//! Helpers shared by the dispatcher and the tools

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::types::McpResult;

/// `arguments` of a `tools/call`, an empty object when absent
pub fn extract_arguments(params: &Value) -> Value {
    params
        .get("arguments")
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()))
}

pub fn extract_tool_name(params: &Value) -> Option<&str> {
    params.get("name").and_then(|v| v.as_str())
}

/// Build a text content response
pub fn text_response(text: String) -> Value {
    json!({
        "content": [{
            "type": "text",
            "text": text
        }]
    })
}

/// Text content response holding pretty-printed JSON
pub fn json_response<T: Serialize>(value: &T) -> McpResult<Value> {
    Ok(text_response(serde_json::to_string_pretty(value)?))
}

/// Build an error content response
pub fn error_response(message: String) -> Value {
    json!({
        "content": [{
            "type": "text",
            "text": format!("Error: {}", message)
        }],
        "isError": true
    })
}

pub fn required_str<'a>(params: &'a Value, key: &str) -> McpResult<&'a str> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("Missing required parameter '{}'", key).into())
}

pub fn optional_str<'a>(params: &'a Value, key: &str) -> Option<&'a str> {
    params.get(key).and_then(|v| v.as_str())
}

/// Non-negative integer argument; rejects other types instead of ignoring them
pub fn optional_usize(params: &Value, key: &str) -> McpResult<Option<usize>> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .map(|v| Some(v as usize))
            .ok_or_else(|| format!("Parameter '{}' must be a non-negative integer", key).into()),
    }
}

pub fn optional_f64(params: &Value, key: &str) -> McpResult<Option<f64>> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| format!("Parameter '{}' must be a number", key).into()),
    }
}

/// Optional argument deserialized through serde, e.g. enums
pub fn optional_enum<T: serde::de::DeserializeOwned>(params: &Value, key: &str) -> McpResult<Option<T>> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| format!("Invalid value for '{}': {}", key, e).into()),
    }
}
