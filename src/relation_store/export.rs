//! Connections CSV export

use std::io::Write;
use std::path::Path;

use crate::types::GraphView;
use crate::utils::{atomic_write_with, AtomicResult};

pub const CONNECTIONS_HEADER: &str = "Source,Target,Strength";

/// Edges carry no weight
pub const UNWEIGHTED_STRENGTH: &str = "N/A";

/// `<stem>_connections.csv` for a relation file name or path
pub fn connections_file_name(relation_file: &str) -> String {
    let stem = Path::new(relation_file)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| relation_file.to_string());
    format!("{}_connections.csv", stem)
}

pub(crate) fn write_connections(target: &Path, view: &GraphView) -> AtomicResult<()> {
    atomic_write_with(target, |file| {
        writeln!(file, "{}", CONNECTIONS_HEADER)?;
        for edge in &view.edges {
            let source = view.node(&edge.source).map(|n| n.label.as_str()).unwrap_or(&edge.source);
            let target = view.node(&edge.target).map(|n| n.label.as_str()).unwrap_or(&edge.target);
            writeln!(file, "{},{},{}", csv_field(source), csv_field(target), UNWEIGHTED_STRENGTH)?;
        }
        Ok(())
    })
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
