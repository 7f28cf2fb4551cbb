//! Data types for the relationship graph pipeline
//!
//! This module contains the core data structures shared by the filter,
//! the analysis runner, the graph stages and the tool surface.

mod analysis;
mod graph;
mod relation;
mod statistics;

pub use analysis::{DocumentStats, Intent, ProgressSnapshot, RunReport, RunStatus};
pub use graph::{GraphView, ViewEdge, ViewNode};
pub use relation::{display_label, normalize_key, Relation, RELATION_SEPARATOR};
pub use statistics::{DegreeRow, DegreeTable, Metric, ObjectCount, OccurrenceCounts, SortKey, SortOrder};

/// Result type for tool and server operations
pub type McpResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;
