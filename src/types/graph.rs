//! Renderable graph view types

use serde::{Deserialize, Serialize};

/// Node of a rendered graph view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewNode {
    /// Normalized node key
    pub id: String,
    pub label: String,
    pub degree: usize,
    pub size: f64,
    pub color: String,
    #[serde(rename = "borderColor")]
    pub border_color: String,
    /// `None` only when the rendered graph has no edges at all
    #[serde(rename = "clusterId")]
    pub cluster_id: Option<usize>,
    pub x: f64,
    pub y: f64,
    /// Raw spellings that folded into this node, first-seen order
    #[serde(rename = "mergedParts", default)]
    pub merged_parts: Vec<String>,
}

/// Edge of a rendered graph view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewEdge {
    pub source: String,
    pub target: String,
    pub color: String,
}

/// Renderable node/edge set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphView {
    #[serde(default)]
    pub nodes: Vec<ViewNode>,
    #[serde(default)]
    pub edges: Vec<ViewEdge>,
}

impl GraphView {
    /// Create an empty view
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the view is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of distinct clusters present in the view
    pub fn cluster_count(&self) -> usize {
        let mut ids: Vec<usize> = self.nodes.iter().filter_map(|n| n.cluster_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }

    /// Look up a node by key
    pub fn node(&self, id: &str) -> Option<&ViewNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
