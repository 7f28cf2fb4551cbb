//! Export connections tool

use std::sync::Arc;

use serde_json::{json, Value};

use crate::protocol::{McpTool, Tool};
use crate::relation_store::RelationStore;
use crate::server::{required_str, text_response};
use crate::types::McpResult;

use super::{store_error_response, view_options, view_schema_properties};

/// Tool saving the edges of a graph view as CSV
pub struct ExportConnectionsTool {
    store: Arc<RelationStore>,
}

impl ExportConnectionsTool {
    pub fn new(store: Arc<RelationStore>) -> Self {
        Self { store }
    }
}

impl Tool for ExportConnectionsTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "export_connections",
            "Save the connections of a graph view to <file>_connections.csv in the export directory",
            json!({
                "type": "object",
                "properties": view_schema_properties(),
                "required": ["file"]
            }),
        )
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let file = required_str(&params, "file")?;
        let options = view_options(&self.store, &params)?;

        match self.store.export_connections(file, &options) {
            Ok(path) => Ok(text_response(format!("Connections saved to {}", path.display()))),
            Err(e) => Ok(store_error_response(&e)),
        }
    }
}
