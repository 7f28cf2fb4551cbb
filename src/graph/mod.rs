//! Relationship graph and its analytics
//!
//! Node keys are interned to dense indices; adjacency is kept as sorted
//! index lists so the degree, clustering and layout loops never hash
//! strings.
//!
//! - `builder`: relation stream → simple graph, plus occurrence counts
//! - `truncate`: keep the N highest-degree nodes
//! - `community`: greedy modularity clustering
//! - `layout`: seeded spring layout

mod builder;
mod community;
mod layout;
mod truncate;

use std::collections::HashMap;

pub use builder::{occurrence_counts, GraphBuilder};
pub use community::{detect_communities, modularity, Partition};
pub use layout::{spring_layout, Layout, LayoutConfig, DEFAULT_LAYOUT_SEED, LAYOUT_SCALE};
pub use truncate::top_by_degree;

/// Undirected simple graph over interned node keys
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationGraph {
    keys: Vec<String>,
    labels: Vec<String>,
    spellings: Vec<Vec<String>>,
    index: HashMap<String, usize>,
    adjacency: Vec<Vec<usize>>,
    edge_count: usize,
}

impl RelationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.keys.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Index of a node key
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn key(&self, node: usize) -> &str {
        &self.keys[node]
    }

    pub fn label(&self, node: usize) -> &str {
        &self.labels[node]
    }

    /// Raw spellings that folded into a node, first-seen order
    pub fn spellings(&self, node: usize) -> &[String] {
        &self.spellings[node]
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Sorted neighbor indices
    pub fn neighbors(&self, node: usize) -> &[usize] {
        &self.adjacency[node]
    }

    /// Number of distinct neighbors
    pub fn degree(&self, node: usize) -> usize {
        self.adjacency[node].len()
    }

    /// Degree of every node, by index
    pub fn degrees(&self) -> Vec<usize> {
        self.adjacency.iter().map(Vec::len).collect()
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.adjacency[a].binary_search(&b).is_ok()
    }

    /// Every edge once, as `(low, high)` index pairs in ascending order
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(a, neighbors)| neighbors.iter().filter(move |&&b| b > a).map(move |&b| (a, b)))
    }

    /// Intern a node, recording the raw spelling; returns its index
    pub(crate) fn intern(&mut self, key: &str, label: String, spelling: &str) -> usize {
        let node = match self.index.get(key) {
            Some(&node) => node,
            None => {
                let node = self.keys.len();
                self.keys.push(key.to_string());
                self.labels.push(label);
                self.spellings.push(Vec::new());
                self.adjacency.push(Vec::new());
                self.index.insert(key.to_string(), node);
                node
            }
        };

        let spellings = &mut self.spellings[node];
        if !spelling.is_empty() && !spellings.iter().any(|s| s == spelling) {
            spellings.push(spelling.to_string());
        }
        node
    }

    /// Insert the undirected edge `{a, b}`; false if present or a self-loop
    pub(crate) fn insert_edge(&mut self, a: usize, b: usize) -> bool {
        if a == b {
            return false;
        }
        match self.adjacency[a].binary_search(&b) {
            Ok(_) => false,
            Err(pos) => {
                self.adjacency[a].insert(pos, b);
                if let Err(pos) = self.adjacency[b].binary_search(&a) {
                    self.adjacency[b].insert(pos, a);
                }
                self.edge_count += 1;
                true
            }
        }
    }

    /// Subgraph induced by `nodes`, in the given order
    ///
    /// Edges survive only when both endpoints are kept.
    pub fn induced_subgraph(&self, nodes: &[usize]) -> RelationGraph {
        let mut sub = RelationGraph::new();
        let mut remap = vec![usize::MAX; self.node_count()];

        for &node in nodes {
            if remap[node] != usize::MAX {
                continue;
            }
            let new_index = sub.keys.len();
            remap[node] = new_index;
            sub.keys.push(self.keys[node].clone());
            sub.labels.push(self.labels[node].clone());
            sub.spellings.push(self.spellings[node].clone());
            sub.adjacency.push(Vec::new());
            sub.index.insert(self.keys[node].clone(), new_index);
        }

        for (a, b) in self.edges() {
            let (na, nb) = (remap[a], remap[b]);
            if na != usize::MAX && nb != usize::MAX {
                sub.insert_edge(na, nb);
            }
        }
        sub
    }

    /// Drop nodes without edges, keeping the order of the rest
    pub fn without_isolates(&self) -> RelationGraph {
        let connected: Vec<usize> = (0..self.node_count()).filter(|&n| self.degree(n) > 0).collect();
        if connected.len() == self.node_count() {
            return self.clone();
        }
        self.induced_subgraph(&connected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_graph() -> RelationGraph {
        let mut graph = RelationGraph::new();
        let a = graph.intern("a", "A".into(), "A");
        let b = graph.intern("b", "B".into(), "B");
        let c = graph.intern("c", "C".into(), "c");
        graph.insert_edge(a, b);
        graph.insert_edge(b, c);
        graph
    }

    #[test]
    fn test_insert_edge_is_simple() {
        let mut graph = path_graph();
        assert!(!graph.insert_edge(1, 0));
        assert!(!graph.insert_edge(2, 2));
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.degrees(), vec![1, 2, 1]);
    }

    #[test]
    fn test_edges_listed_once() {
        let edges: Vec<_> = path_graph().edges().collect();
        assert_eq!(edges, vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn test_intern_records_distinct_spellings() {
        let mut graph = path_graph();
        graph.intern("a", "A".into(), "a");
        graph.intern("a", "A".into(), "A");
        assert_eq!(graph.spellings(0), &["A".to_string(), "a".to_string()]);
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn test_induced_subgraph_drops_dangling_edges() {
        let sub = path_graph().induced_subgraph(&[0, 1]);
        assert_eq!(sub.node_count(), 2);
        assert_eq!(sub.edge_count(), 1);
        assert_eq!(sub.index_of("c"), None);
    }

    #[test]
    fn test_without_isolates() {
        let mut graph = path_graph();
        graph.intern("lonely", "Lonely".into(), "Lonely");
        let pruned = graph.without_isolates();
        assert_eq!(pruned.node_count(), 3);
        assert_eq!(pruned.index_of("lonely"), None);
    }
}
