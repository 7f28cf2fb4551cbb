//! Connexa Graph
//!
//! Turns free text into a relationship graph. An external model extracts
//! `"A; B"` pairs chunk by chunk; the pairs are filtered, stored one per
//! line, and rebuilt on demand into a clustered, laid-out, color-encoded
//! graph view.
//!
//! # Modules
//!
//! - `types`: shared data structures (Relation, GraphView, DegreeTable, run state)
//! - `validation`: line filter for model output
//! - `extraction`: the `Extractor` seam and the external-command extractor
//! - `analysis`: chunked background runs with progress and cancellation
//! - `graph`: graph building, truncation, communities, layout
//! - `visual`: degree-based size and color encoding, view assembly
//! - `relation_store`: queries over relation files, CSV export
//! - `config`: environment configuration
//! - `protocol`, `server`, `tools`: the MCP stdio surface
//! - `utils`: atomic file writes
//!
//! # Example
//!
//! ```no_run
//! use connexa_graph::{RelationStore, ViewOptions};
//!
//! let store = RelationStore::new("output/filtered", "output/csv");
//! let view = store
//!     .build_graph_view("filtered_output_related_people_report.txt", &ViewOptions::default())
//!     .unwrap();
//! println!("{} nodes, {} edges", view.nodes.len(), view.edges.len());
//! ```

pub mod analysis;
pub mod config;
pub mod extraction;
pub mod graph;
pub mod protocol;
pub mod relation_store;
pub mod server;
pub mod tools;
pub mod types;
pub mod utils;
pub mod validation;
pub mod visual;

// Re-export commonly used items at crate root
pub use analysis::{AnalysisHandle, AnalysisRunner, AnalysisService, RunnerConfig};
pub use config::Config;
pub use extraction::{CommandExtractor, ExtractionError, Extractor};
pub use graph::{GraphBuilder, RelationGraph};
pub use protocol::{McpTool, ServerInfo, Tool};
pub use relation_store::{RelationStore, StoreError};
pub use server::McpServer;
pub use types::{
    DegreeTable, GraphView, Intent, McpResult, ProgressSnapshot, Relation, RunReport, RunStatus, ViewEdge,
    ViewNode,
};
pub use visual::{Rgb, ViewOptions, VisualEncoder, VisualStyle};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
