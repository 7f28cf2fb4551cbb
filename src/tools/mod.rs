//! MCP tools
//!
//! - Analysis tools (3): start, poll and cancel extraction runs
//! - Graph tools (6): graph view, statistics and export over relation files

pub mod analysis;
pub mod graph;

use std::sync::Arc;

use crate::analysis::AnalysisService;
use crate::relation_store::RelationStore;
use crate::server::McpServer;

pub use analysis::{CancelAnalysisTool, GetProgressTool, StartAnalysisTool};
pub use graph::{
    BuildGraphViewTool, DegreeTableTool, ExportConnectionsTool, FrequentObjectsTool, ListRelationFilesTool,
    OccurrenceCountsTool,
};

/// Register all tools with the MCP server
pub fn register_all_tools(server: &mut McpServer, store: Arc<RelationStore>, service: Arc<AnalysisService>) {
    // Analysis tools (3)
    server.register_tool(Box::new(StartAnalysisTool::new(service.clone())));
    server.register_tool(Box::new(GetProgressTool::new(service.clone())));
    server.register_tool(Box::new(CancelAnalysisTool::new(service)));

    // Graph tools (6)
    server.register_tool(Box::new(ListRelationFilesTool::new(store.clone())));
    server.register_tool(Box::new(BuildGraphViewTool::new(store.clone())));
    server.register_tool(Box::new(DegreeTableTool::new(store.clone())));
    server.register_tool(Box::new(OccurrenceCountsTool::new(store.clone())));
    server.register_tool(Box::new(FrequentObjectsTool::new(store.clone())));
    server.register_tool(Box::new(ExportConnectionsTool::new(store)));
}
