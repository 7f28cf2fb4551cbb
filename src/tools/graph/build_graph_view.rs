//! Build graph view tool

use std::sync::Arc;

use serde_json::{json, Value};

use crate::protocol::{McpTool, Tool};
use crate::relation_store::RelationStore;
use crate::server::{json_response, required_str};
use crate::types::McpResult;

use super::{store_error_response, view_options, view_schema_properties};

/// Tool rendering a relation file as a clustered, laid-out graph
pub struct BuildGraphViewTool {
    store: Arc<RelationStore>,
}

impl BuildGraphViewTool {
    pub fn new(store: Arc<RelationStore>) -> Self {
        Self { store }
    }
}

impl Tool for BuildGraphViewTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "build_graph_view",
            "Build the relationship graph of a relation file: top objects by degree, community clusters, positions, sizes and colors.",
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

        match self.store.build_graph_view(file, &options) {
            Ok(view) => json_response(&view),
            Err(e) => Ok(store_error_response(&e)),
        }
    }
}
