//! Protocol types for MCP and JSON-RPC communication

mod jsonrpc;
mod mcp;

pub use jsonrpc::{
    ErrorObject, JsonRpcError, JsonRpcRequest, JsonRpcResponse, INTERNAL_ERROR, INVALID_PARAMS,
    INVALID_REQUEST, JSONRPC_VERSION, METHOD_NOT_FOUND, PARSE_ERROR,
};
pub use mcp::{McpTool, ServerInfo, Tool, PROTOCOL_VERSION};
