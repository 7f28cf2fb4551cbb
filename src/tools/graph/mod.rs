//! Graph tools
//!
//! Read-only queries over the filtered relation files: the rendered
//! graph view, degree and frequency statistics, and CSV export.

mod build_graph_view;
mod degree_table;
mod export_connections;
mod frequent_objects;
mod list_relation_files;
mod occurrence_counts;

pub use build_graph_view::BuildGraphViewTool;
pub use degree_table::DegreeTableTool;
pub use export_connections::ExportConnectionsTool;
pub use frequent_objects::FrequentObjectsTool;
pub use list_relation_files::ListRelationFilesTool;
pub use occurrence_counts::OccurrenceCountsTool;

use serde_json::{json, Value};

use crate::relation_store::{RelationStore, StoreError};
use crate::server::{error_response, optional_f64, optional_str, optional_usize};
use crate::types::McpResult;
use crate::visual::{Rgb, ViewOptions};

/// Input schema properties shared by tools that render a view
pub(crate) fn view_schema_properties() -> Value {
    json!({
        "file": {
            "type": "string",
            "description": "Relation file name in the filtered output directory, or an absolute path"
        },
        "maxObjects": {
            "type": "integer",
            "description": "Keep only this many highest-degree objects (default 50)"
        },
        "minColor": {
            "type": "string",
            "description": "Color of the least connected objects, #rrggbb (default #FF69B4)"
        },
        "maxColor": {
            "type": "string",
            "description": "Color of the most connected objects, #rrggbb (default #1E90FF)"
        },
        "avgSize": {
            "type": "number",
            "description": "Base node size (default 30)"
        }
    })
}

/// View options from tool arguments, store defaults for missing ones
pub(crate) fn view_options(store: &RelationStore, params: &Value) -> McpResult<ViewOptions> {
    let mut options = store.view_options();
    if let Some(max_objects) = optional_usize(params, "maxObjects")? {
        options.max_objects = max_objects;
    }
    if let Some(color) = optional_str(params, "minColor") {
        options.style.min_color = Rgb::parse(color).map_err(StoreError::InvalidColor)?;
    }
    if let Some(color) = optional_str(params, "maxColor") {
        options.style.max_color = Rgb::parse(color).map_err(StoreError::InvalidColor)?;
    }
    if let Some(size) = optional_f64(params, "avgSize")? {
        if !size.is_finite() || size <= 0.0 {
            return Err(format!("avgSize must be a positive number, got {}", size).into());
        }
        options.style.avg_size = size;
    }
    Ok(options)
}

/// Inline error content for store failures
pub(crate) fn store_error_response(error: &StoreError) -> Value {
    error_response(error.to_string())
}
