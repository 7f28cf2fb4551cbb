//! Get progress tool

use std::sync::Arc;

use serde_json::{json, Value};

use crate::analysis::AnalysisService;
use crate::protocol::{McpTool, Tool};
use crate::server::{error_response, json_response};
use crate::types::McpResult;

use super::run_id;

/// Tool reporting progress of one run, or of every run
pub struct GetProgressTool {
    service: Arc<AnalysisService>,
}

impl GetProgressTool {
    pub fn new(service: Arc<AnalysisService>) -> Self {
        Self { service }
    }
}

impl Tool for GetProgressTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "get_progress",
            "Get the progress (0-100) and status of an analysis run. Without runId, lists all runs.",
            json!({
                "type": "object",
                "properties": {
                    "runId": { "type": "integer", "description": "Run id returned by start_analysis" }
                },
                "required": []
            }),
        )
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        match run_id(&params)? {
            Some(id) => match self.service.progress(id) {
                Some(snapshot) => json_response(&snapshot),
                None => Ok(error_response(format!("Unknown run {}", id))),
            },
            None => json_response(&self.service.snapshots()),
        }
    }
}
