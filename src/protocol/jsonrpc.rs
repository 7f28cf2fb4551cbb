//! JSON-RPC 2.0 message types

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const JSONRPC_VERSION: &str = "2.0";

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

/// Incoming request or notification
#[derive(Deserialize, Debug, Clone)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn is_valid(&self) -> bool {
        self.jsonrpc == JSONRPC_VERSION
    }

    /// Notifications carry no id and get no response
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Serialize, Debug)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    pub result: Value,
}

impl JsonRpcResponse {
    pub fn new(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct JsonRpcError {
    pub jsonrpc: String,
    pub id: Value,
    pub error: ErrorObject,
}

impl JsonRpcError {
    pub fn new(id: Value, code: i32, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            error: ErrorObject {
                code,
                message: message.into(),
                data,
            },
        }
    }

    pub fn parse_error(details: impl Into<String>) -> Self {
        Self::new(Value::Null, PARSE_ERROR, "Parse error", Some(json!({"details": details.into()})))
    }

    pub fn invalid_request(id: Value, details: impl Into<String>) -> Self {
        Self::new(id, INVALID_REQUEST, "Invalid Request", Some(json!({"details": details.into()})))
    }

    pub fn method_not_found(id: Value, method: &str) -> Self {
        Self::new(id, METHOD_NOT_FOUND, "Method not found", Some(json!({"method": method})))
    }

    pub fn invalid_params(id: Value, details: impl Into<String>) -> Self {
        Self::new(id, INVALID_PARAMS, "Invalid params", Some(json!({"details": details.into()})))
    }

    pub fn unknown_tool(id: Value, tool: &str) -> Self {
        Self::new(id, INVALID_PARAMS, "Unknown tool", Some(json!({"tool": tool})))
    }

    pub fn internal_error(id: Value, details: impl Into<String>) -> Self {
        Self::new(id, INTERNAL_ERROR, "Internal error", Some(json!({"details": details.into()})))
    }
}

#[derive(Serialize, Debug)]
pub struct ErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_without_id_is_notification() {
        let request: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).unwrap();
        assert!(request.is_valid());
        assert!(request.is_notification());
    }

    #[test]
    fn test_error_serialization_omits_empty_data() {
        let error = JsonRpcError::new(json!(1), INTERNAL_ERROR, "boom", None);
        let text = serde_json::to_string(&error).unwrap();
        assert_eq!(text, r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32603,"message":"boom"}}"#);
    }
}
