//! Occurrence counts tool

use std::sync::Arc;

use serde_json::{json, Value};

use crate::protocol::{McpTool, Tool};
use crate::relation_store::RelationStore;
use crate::server::{json_response, required_str};
use crate::types::McpResult;

use super::store_error_response;

/// Tool counting how often each object is mentioned, repeats included
pub struct OccurrenceCountsTool {
    store: Arc<RelationStore>,
}

impl OccurrenceCountsTool {
    pub fn new(store: Arc<RelationStore>) -> Self {
        Self { store }
    }
}

impl Tool for OccurrenceCountsTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "occurrence_counts",
            "Count every mention of each object across all relations of a file",
            json!({
                "type": "object",
                "properties": {
                    "file": { "type": "string", "description": "Relation file name or absolute path" }
                },
                "required": ["file"]
            }),
        )
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let file = required_str(&params, "file")?;
        match self.store.occurrence_counts(file) {
            Ok(counts) => json_response(&counts),
            Err(e) => Ok(store_error_response(&e)),
        }
    }
}
