//! Cancel analysis tool

use std::sync::Arc;

use serde_json::{json, Value};

use crate::analysis::AnalysisService;
use crate::protocol::{McpTool, Tool};
use crate::server::{error_response, text_response};
use crate::types::McpResult;

use super::run_id;

/// Tool asking a running analysis to stop after its current chunk
pub struct CancelAnalysisTool {
    service: Arc<AnalysisService>,
}

impl CancelAnalysisTool {
    pub fn new(service: Arc<AnalysisService>) -> Self {
        Self { service }
    }
}

impl Tool for CancelAnalysisTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "cancel_analysis",
            "Stop a running analysis before its next chunk. Output written so far is kept.",
            json!({
                "type": "object",
                "properties": {
                    "runId": { "type": "integer", "description": "Run id returned by start_analysis" }
                },
                "required": ["runId"]
            }),
        )
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let id = run_id(&params)?.ok_or("Missing required parameter 'runId'")?;
        let text = match self.service.request_cancel(id) {
            Some(true) => format!("Cancellation requested for run {}", id),
            Some(false) => format!("Run {} is not running", id),
            None => return Ok(error_response(format!("Unknown run {}", id))),
        };
        Ok(text_response(text))
    }
}
