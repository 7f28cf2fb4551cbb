//! Frequent objects tool

use std::sync::Arc;

use serde_json::{json, Value};

use crate::protocol::{McpTool, Tool};
use crate::relation_store::{RelationStore, DEFAULT_MIN_COUNT, DEFAULT_TOP_N};
use crate::server::{json_response, optional_enum, optional_usize, required_str, text_response};
use crate::types::{McpResult, Metric};

use super::store_error_response;

/// Tool ranking the objects seen more often than a threshold
pub struct FrequentObjectsTool {
    store: Arc<RelationStore>,
}

impl FrequentObjectsTool {
    pub fn new(store: Arc<RelationStore>) -> Self {
        Self { store }
    }
}

impl Tool for FrequentObjectsTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "frequent_objects",
            "Objects whose count is above minCount, most frequent first, for frequency charts",
            json!({
                "type": "object",
                "properties": {
                    "file": { "type": "string", "description": "Relation file name or absolute path" },
                    "metric": {
                        "type": "string",
                        "enum": ["occurrence", "degree"],
                        "description": "Count raw mentions or distinct connections (default occurrence)"
                    },
                    "minCount": { "type": "integer", "description": "Exclusive lower bound (default 3)" },
                    "topN": { "type": "integer", "description": "Maximum number of objects (default 50)" }
                },
                "required": ["file"]
            }),
        )
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let file = required_str(&params, "file")?;
        let metric: Metric = optional_enum(&params, "metric")?.unwrap_or_default();
        let min_count = optional_usize(&params, "minCount")?.unwrap_or(DEFAULT_MIN_COUNT);
        let top_n = optional_usize(&params, "topN")?.unwrap_or(DEFAULT_TOP_N);

        match self.store.frequent_objects(file, metric, min_count, top_n) {
            Ok(objects) if objects.is_empty() => {
                let noun = match metric {
                    Metric::Occurrence => "occurrences",
                    Metric::Degree => "connections",
                };
                Ok(text_response(format!("No objects with more than {} {} found.", min_count, noun)))
            }
            Ok(objects) => json_response(&objects),
            Err(e) => Ok(store_error_response(&e)),
        }
    }
}
