//! Relations → renderable graph view

use tracing::debug;

use crate::graph::{
    detect_communities, spring_layout, top_by_degree, GraphBuilder, Layout, LayoutConfig, Partition,
    RelationGraph, DEFAULT_LAYOUT_SEED,
};
use crate::types::{GraphView, Relation, ViewEdge, ViewNode};

use super::encoder::{VisualEncoder, VisualStyle};

pub const DEFAULT_MAX_OBJECTS: usize = 50;

/// Options of one graph view request
#[derive(Debug, Clone, PartialEq)]
pub struct ViewOptions {
    pub max_objects: usize,
    pub style: VisualStyle,
    pub seed: u64,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            max_objects: DEFAULT_MAX_OBJECTS,
            style: VisualStyle::default(),
            seed: DEFAULT_LAYOUT_SEED,
        }
    }
}

/// Full pipeline: build, truncate, cluster, lay out, encode
pub fn build_view(relations: &[Relation], options: &ViewOptions) -> GraphView {
    let graph = GraphBuilder::from_relations(relations).without_isolates();
    let graph = top_by_degree(&graph, options.max_objects);

    let partition = detect_communities(&graph);
    let layout = spring_layout(&graph, &LayoutConfig::with_seed(options.seed));
    let encoder = VisualEncoder::new(options.style, &graph.degrees());

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        clusters = partition.cluster_count(),
        "graph view built"
    );
    compose_view(&graph, &partition, &layout, &encoder)
}

/// Assemble view nodes and edges from precomputed parts
///
/// `partition` and `layout` must have been computed on `graph`.
pub fn compose_view(
    graph: &RelationGraph,
    partition: &Partition,
    layout: &Layout,
    encoder: &VisualEncoder,
) -> GraphView {
    let degrees = graph.degrees();

    let nodes = (0..graph.node_count())
        .map(|node| {
            let degree = degrees[node];
            let (x, y) = layout.position(node).unwrap_or((0.0, 0.0));
            ViewNode {
                id: graph.key(node).to_string(),
                label: graph.label(node).to_string(),
                degree,
                size: encoder.node_size(degree),
                color: encoder.node_color(degree).to_hex(),
                border_color: encoder.border_color(degree).to_hex(),
                cluster_id: partition.cluster_of(node),
                x,
                y,
                merged_parts: graph.spellings(node).to_vec(),
            }
        })
        .collect();

    let edges = graph
        .edges()
        .map(|(a, b)| ViewEdge {
            source: graph.key(a).to_string(),
            target: graph.key(b).to_string(),
            color: encoder.edge_color(degrees[a], degrees[b]).to_hex(),
        })
        .collect();

    GraphView { nodes, edges }
}
