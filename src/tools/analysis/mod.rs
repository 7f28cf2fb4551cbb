//! Analysis tools
//!
//! Start a background extraction run, poll it, and cancel it.

mod cancel_analysis;
mod get_progress;
mod start_analysis;

pub use cancel_analysis::CancelAnalysisTool;
pub use get_progress::GetProgressTool;
pub use start_analysis::StartAnalysisTool;

use serde_json::Value;

use crate::server::optional_usize;
use crate::types::McpResult;

pub(crate) fn run_id(params: &Value) -> McpResult<Option<u64>> {
    Ok(optional_usize(params, "runId")?.map(|id| id as u64))
}
