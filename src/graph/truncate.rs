//! Top-N retention

use super::RelationGraph;

/// Keep the `max_objects` highest-degree nodes
///
/// Ranking uses degrees in the full graph; ties keep first-seen order.
/// Edges survive only between retained nodes, and a retained node stays
/// even if it loses all of its edges.
pub fn top_by_degree(graph: &RelationGraph, max_objects: usize) -> RelationGraph {
    if graph.node_count() <= max_objects {
        return graph.clone();
    }

    let degrees = graph.degrees();
    let mut order: Vec<usize> = (0..graph.node_count()).collect();
    order.sort_by(|&a, &b| degrees[b].cmp(&degrees[a]));
    order.truncate(max_objects);

    graph.induced_subgraph(&order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::types::Relation;

    #[test]
    fn test_keeps_highest_degree_nodes() {
        // hub connects to everyone, "b" also has a second edge
        let relations = vec![
            Relation::new("a", "hub"),
            Relation::new("b", "hub"),
            Relation::new("c", "hub"),
            Relation::new("b", "c"),
        ];
        let graph = GraphBuilder::from_relations(&relations);
        let top = top_by_degree(&graph, 2);

        assert_eq!(top.keys(), &["hub".to_string(), "b".to_string()]);
        assert_eq!(top.edge_count(), 1);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let relations = vec![Relation::new("a", "b"), Relation::new("c", "d")];
        let graph = GraphBuilder::from_relations(&relations);
        let top = top_by_degree(&graph, 3);

        assert_eq!(top.keys(), &["a".to_string(), "b".to_string(), "c".to_string()]);
        // "c" lost its only neighbor but is retained
        assert_eq!(top.degree(2), 0);
    }

    #[test]
    fn test_zero_keeps_nothing() {
        let graph = GraphBuilder::from_relations(&[Relation::new("a", "b")]);
        assert!(top_by_degree(&graph, 0).is_empty());
    }
}
