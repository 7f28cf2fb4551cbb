//! Start analysis tool

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::analysis::AnalysisService;
use crate::protocol::{McpTool, Tool};
use crate::server::{error_response, json_response, optional_str, required_str};
use crate::types::{Intent, McpResult};

fn intent_description() -> String {
    let choices: Vec<String> = Intent::ALL
        .iter()
        .map(|i| format!("{} ({})", i.slug(), i.description()))
        .collect();
    format!("Which relations to extract: {}", choices.join("; "))
}

/// Tool that starts a background extraction run over one document
pub struct StartAnalysisTool {
    service: Arc<AnalysisService>,
}

impl StartAnalysisTool {
    pub fn new(service: Arc<AnalysisService>) -> Self {
        Self { service }
    }
}

impl Tool for StartAnalysisTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "start_analysis",
            "Start extracting relations from a plain-text document in the background. Returns a run id to poll with get_progress.",
            json!({
                "type": "object",
                "properties": {
                    "intent": {
                        "type": "string",
                        "enum": Intent::ALL.iter().map(|i| i.slug()).collect::<Vec<_>>(),
                        "description": intent_description()
                    },
                    "documentPath": {
                        "type": "string",
                        "description": "Path of a UTF-8 text document to analyse"
                    },
                    "documentText": {
                        "type": "string",
                        "description": "Document text, used instead of documentPath"
                    },
                    "documentName": {
                        "type": "string",
                        "description": "File name used for the output files when documentText is given"
                    }
                },
                "required": ["intent"]
            }),
        )
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let intent: Intent = required_str(&params, "intent")?.parse()?;

        let (text, name) = match (optional_str(&params, "documentPath"), optional_str(&params, "documentText")) {
            (Some(path), _) => {
                let path = Path::new(path);
                let text = match fs::read_to_string(path) {
                    Ok(text) => text,
                    Err(e) => return Ok(error_response(format!("cannot read {}: {}", path.display(), e))),
                };
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "document.txt".to_string());
                (text, name)
            }
            (None, Some(text)) => {
                let name = optional_str(&params, "documentName").unwrap_or("document.txt");
                (text.to_string(), name.to_string())
            }
            (None, None) => return Err("Either documentPath or documentText is required".into()),
        };

        match self.service.start_analysis(text, &name, intent) {
            Ok(handle) => json_response(&json!({
                "runId": handle.id(),
                "intent": intent,
                "document": handle.document(),
                "rawOutput": handle.paths().raw,
                "filteredOutput": handle.paths().filtered,
            })),
            Err(e) => Ok(error_response(e.to_string())),
        }
    }
}
