//! List relation files tool

use std::sync::Arc;

use serde_json::{json, Value};

use crate::protocol::{McpTool, Tool};
use crate::relation_store::RelationStore;
use crate::server::{json_response, text_response};
use crate::types::McpResult;

use super::store_error_response;

/// Tool listing the relation files available for graph queries
pub struct ListRelationFilesTool {
    store: Arc<RelationStore>,
}

impl ListRelationFilesTool {
    pub fn new(store: Arc<RelationStore>) -> Self {
        Self { store }
    }
}

impl Tool for ListRelationFilesTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "list_relation_files",
            "List the filtered relation files produced by previous analysis runs",
            json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        )
    }

    fn execute(&self, _params: Value) -> McpResult<Value> {
        match self.store.list_relation_files() {
            Ok(files) if files.is_empty() => Ok(text_response("No relation files found.".to_string())),
            Ok(files) => json_response(&files),
            Err(e) => Ok(store_error_response(&e)),
        }
    }
}
