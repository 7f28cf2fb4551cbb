//! Degree table tool

use std::sync::Arc;

use serde_json::{json, Value};

use crate::protocol::{McpTool, Tool};
use crate::relation_store::{RelationStore, StoreError};
use crate::server::{error_response, json_response, optional_enum, required_str};
use crate::types::{McpResult, SortKey, SortOrder};

/// Tool returning every object with its number of distinct connections
pub struct DegreeTableTool {
    store: Arc<RelationStore>,
}

impl DegreeTableTool {
    pub fn new(store: Arc<RelationStore>) -> Self {
        Self { store }
    }
}

impl Tool for DegreeTableTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "degree_table",
            "Table of objects and their degree (number of distinct connections) over the whole relation file",
            json!({
                "type": "object",
                "properties": {
                    "file": { "type": "string", "description": "Relation file name or absolute path" },
                    "sortBy": {
                        "type": "string",
                        "enum": ["degree", "object"],
                        "description": "Column to sort by (default degree)"
                    },
                    "order": {
                        "type": "string",
                        "enum": ["asc", "desc"],
                        "description": "Sort direction (default desc)"
                    }
                },
                "required": ["file"]
            }),
        )
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let file = required_str(&params, "file")?;
        let sort_by = optional_enum(&params, "sortBy")?.unwrap_or(SortKey::Degree);
        let order = optional_enum(&params, "order")?.unwrap_or(SortOrder::Desc);

        match self.store.degree_table(file) {
            Ok(table) => json_response(&table.sorted(sort_by, order)),
            Err(e @ StoreError::NotFound(_)) => Ok(error_response(e.to_string())),
            Err(e) => Ok(error_response(format!("Error loading table: {}", e))),
        }
    }
}
