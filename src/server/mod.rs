//! MCP server over line-delimited JSON-RPC
//!
//! One request per line in, one response per line out. Notifications get
//! no response. Logging goes to stderr, never to the response stream.

mod handlers;

use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpTool, ServerInfo, Tool, PROTOCOL_VERSION};
use crate::types::McpResult;

pub use handlers::*;

/// Tool registry plus the request dispatcher
pub struct McpServer {
    server_info: ServerInfo,
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl McpServer {
    pub fn new() -> Self {
        Self::with_info(ServerInfo::default())
    }

    pub fn with_info(info: ServerInfo) -> Self {
        Self {
            server_info: info,
            tools: BTreeMap::new(),
        }
    }

    pub fn register_tool(&mut self, tool: Box<dyn Tool>) -> &mut Self {
        let name = tool.name();
        self.tools.insert(name, tool);
        self
    }

    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    /// Tool names, sorted
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// Serve stdin/stdout until stdin closes
    pub fn run(&self) -> McpResult<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.serve(stdin.lock(), stdout.lock())
    }

    /// Serve any line reader/writer pair until the reader is exhausted
    pub fn serve<R: BufRead, W: Write>(&self, mut reader: R, mut writer: W) -> McpResult<()> {
        info!(name = %self.server_info.name, tools = self.tools.len(), "server ready");
        let mut line = String::new();
        while reader.read_line(&mut line)? > 0 {
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                if let Some(response) = self.handle_line(trimmed)? {
                    writeln!(writer, "{}", response)?;
                    writer.flush()?;
                }
            }
            line.clear();
        }
        info!("input closed, server stopping");
        Ok(())
    }

    /// Handle one request line; `None` for notifications
    pub fn handle_line(&self, request_str: &str) -> McpResult<Option<String>> {
        let request: JsonRpcRequest = match serde_json::from_str(request_str) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "unparseable request");
                return encode(&JsonRpcError::parse_error(e.to_string())).map(Some);
            }
        };

        if !request.is_valid() {
            let id = request.id.unwrap_or(Value::Null);
            return encode(&JsonRpcError::invalid_request(id, "jsonrpc must be '2.0'")).map(Some);
        }

        if request.is_notification() {
            debug!(method = %request.method, "notification");
            return Ok(None);
        }

        let id = request.id.clone().unwrap_or(Value::Null);
        debug!(method = %request.method, "request");

        let response = match request.method.as_str() {
            "initialize" => encode(&JsonRpcResponse::new(id, self.initialize_result()))?,
            "tools/list" => encode(&JsonRpcResponse::new(id, self.tools_list_result()))?,
            "tools/call" => self.handle_tool_call(id, request.params)?,
            "ping" => encode(&JsonRpcResponse::new(id, json!({})))?,
            other => encode(&JsonRpcError::method_not_found(id, other))?,
        };
        Ok(Some(response))
    }

    fn initialize_result(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": self.server_info.name,
                "version": self.server_info.version
            }
        })
    }

    fn tools_list_result(&self) -> Value {
        let tools: Vec<McpTool> = self.tools.values().map(|t| t.definition()).collect();
        json!({ "tools": tools })
    }

    fn handle_tool_call(&self, id: Value, params: Option<Value>) -> McpResult<String> {
        let params = match params {
            Some(params) => params,
            None => return encode(&JsonRpcError::invalid_params(id, "missing parameters")),
        };
        let tool_name = match extract_tool_name(&params) {
            Some(name) => name,
            None => return encode(&JsonRpcError::invalid_params(id, "missing tool name")),
        };
        let tool = match self.tools.get(tool_name) {
            Some(tool) => tool,
            None => return encode(&JsonRpcError::unknown_tool(id, tool_name)),
        };

        let result = match tool.execute(extract_arguments(&params)) {
            Ok(result) => result,
            Err(e) => {
                warn!(tool = tool_name, error = %e, "tool failed");
                error_response(e.to_string())
            }
        };
        encode(&JsonRpcResponse::new(id, result))
    }
}

impl Default for McpServer {
    fn default() -> Self {
        Self::new()
    }
}

fn encode<T: Serialize>(message: &T) -> McpResult<String> {
    Ok(serde_json::to_string(message)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    impl Tool for EchoTool {
        fn definition(&self) -> McpTool {
            McpTool::new("echo", "Echo the text argument", json!({"type": "object"}))
        }

        fn execute(&self, params: Value) -> McpResult<Value> {
            let text = required_str(&params, "text")?;
            Ok(text_response(text.to_string()))
        }
    }

    fn server() -> McpServer {
        let mut server = McpServer::new();
        server.register_tool(Box::new(EchoTool));
        server
    }

    fn call(server: &McpServer, request: &str) -> Value {
        let line = server.handle_line(request).unwrap().unwrap();
        serde_json::from_str(&line).unwrap()
    }

    #[test]
    fn test_initialize_reports_server_info() {
        let response = call(&server(), r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#);
        assert_eq!(response["result"]["serverInfo"]["name"], "connexa-graph");
        assert_eq!(response["result"]["protocolVersion"], PROTOCOL_VERSION);
    }

    #[test]
    fn test_tool_call_and_tool_error() {
        let server = server();
        let ok = call(
            &server,
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"echo","arguments":{"text":"hi"}}}"#,
        );
        assert_eq!(ok["result"]["content"][0]["text"], "hi");

        let failed = call(
            &server,
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"echo","arguments":{}}}"#,
        );
        assert_eq!(failed["result"]["isError"], true);
    }

    #[test]
    fn test_protocol_errors() {
        let server = server();
        assert_eq!(call(&server, "not json")["error"]["code"], -32700);
        assert_eq!(
            call(&server, r#"{"jsonrpc":"1.0","id":1,"method":"ping"}"#)["error"]["code"],
            -32600
        );
        assert_eq!(
            call(&server, r#"{"jsonrpc":"2.0","id":1,"method":"nope"}"#)["error"]["code"],
            -32601
        );
        assert_eq!(
            call(
                &server,
                r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"missing"}}"#
            )["error"]["message"],
            "Unknown tool"
        );
    }

    #[test]
    fn test_notifications_get_no_response() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .unwrap();
        assert!(response.is_none());
    }

    #[test]
    fn test_serve_writes_one_line_per_request() {
        let input = "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n\n{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"tools/list\"}\n";
        let mut output = Vec::new();
        server().serve(input.as_bytes(), &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("\"echo\""));
    }
}
