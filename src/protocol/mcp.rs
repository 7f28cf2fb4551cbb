//! MCP (Model Context Protocol) types

use serde::Serialize;
use serde_json::Value;

use crate::types::McpResult;

pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Tool definition as listed by `tools/list`
#[derive(Serialize, Debug, Clone)]
pub struct McpTool {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl McpTool {
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// Server identity reported during the handshake
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

impl ServerInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}

/// A callable tool
///
/// Every tool exposed by the server implements this trait.
pub trait Tool: Send + Sync {
    fn definition(&self) -> McpTool;

    /// Run with the `arguments` object of a `tools/call` request
    fn execute(&self, params: Value) -> McpResult<Value>;

    fn name(&self) -> String {
        self.definition().name
    }
}
