//! Greedy modularity community detection
//!
//! Agglomerative merging in the Clauset–Newman–Moore manner: every node
//! starts alone, and the connected pair of communities with the largest
//! modularity gain is merged until no merge gains anything.

use std::collections::BTreeMap;

use super::RelationGraph;

/// Disjoint cover of a graph's nodes by cluster id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    cluster_of: Vec<usize>,
    cluster_count: usize,
}

impl Partition {
    /// Cluster id of a node, `None` for an empty partition
    pub fn cluster_of(&self, node: usize) -> Option<usize> {
        self.cluster_of.get(node).copied()
    }

    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    pub fn is_empty(&self) -> bool {
        self.cluster_of.is_empty()
    }

    /// Members of every cluster, indexed by cluster id
    pub fn clusters(&self) -> Vec<Vec<usize>> {
        let mut clusters = vec![Vec::new(); self.cluster_count];
        for (node, &cluster) in self.cluster_of.iter().enumerate() {
            clusters[cluster].push(node);
        }
        clusters
    }
}

/// Partition `graph` by greedy modularity maximization
///
/// Ties between equal gains go to the pair with the lowest community
/// indices. Ids are dense, larger clusters first, then by smallest member.
/// An edgeless graph yields an empty partition.
pub fn detect_communities(graph: &RelationGraph) -> Partition {
    let n = graph.node_count();
    let m = graph.edge_count();
    if n == 0 || m == 0 {
        return Partition::default();
    }

    let m = m as f64;
    let mut degree: Vec<f64> = graph.degrees().into_iter().map(|d| d as f64).collect();
    let mut links: Vec<BTreeMap<usize, usize>> = (0..n)
        .map(|node| graph.neighbors(node).iter().map(|&other| (other, 1)).collect())
        .collect();
    let mut members: Vec<Vec<usize>> = (0..n).map(|node| vec![node]).collect();
    let mut active = vec![true; n];

    let gain = |between: usize, d_i: f64, d_j: f64| between as f64 / m - d_i * d_j / (2.0 * m * m);

    loop {
        let mut best: Option<(f64, usize, usize)> = None;
        for i in 0..n {
            if !active[i] {
                continue;
            }
            for (&j, &between) in links[i].range(i + 1..) {
                let dq = gain(between, degree[i], degree[j]);
                if best.map_or(true, |(best_dq, _, _)| dq > best_dq) {
                    best = Some((dq, i, j));
                }
            }
        }

        let (i, j) = match best {
            Some((dq, i, j)) if dq > 0.0 => (i, j),
            _ => break,
        };

        // fold j into i
        let absorbed = std::mem::take(&mut links[j]);
        for (k, between) in absorbed {
            links[k].remove(&j);
            if k == i {
                continue;
            }
            *links[i].entry(k).or_insert(0) += between;
            *links[k].entry(i).or_insert(0) += between;
        }
        degree[i] += degree[j];
        let moved = std::mem::take(&mut members[j]);
        members[i].extend(moved);
        active[j] = false;
    }

    let mut communities: Vec<Vec<usize>> = members
        .into_iter()
        .filter(|group| !group.is_empty())
        .map(|mut group| {
            group.sort_unstable();
            group
        })
        .collect();
    communities.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a[0].cmp(&b[0])));

    let mut cluster_of = vec![0; n];
    for (cluster, group) in communities.iter().enumerate() {
        for &node in group {
            cluster_of[node] = cluster;
        }
    }

    Partition {
        cluster_of,
        cluster_count: communities.len(),
    }
}

/// Newman modularity of `partition` over `graph`; 0 for edgeless graphs
pub fn modularity(graph: &RelationGraph, partition: &Partition) -> f64 {
    let m = graph.edge_count();
    if m == 0 || partition.is_empty() {
        return 0.0;
    }
    let m = m as f64;

    let mut internal = vec![0usize; partition.cluster_count()];
    let mut degree_sum = vec![0usize; partition.cluster_count()];

    for node in 0..graph.node_count() {
        if let Some(cluster) = partition.cluster_of(node) {
            degree_sum[cluster] += graph.degree(node);
        }
    }
    for (a, b) in graph.edges() {
        match (partition.cluster_of(a), partition.cluster_of(b)) {
            (Some(ca), Some(cb)) if ca == cb => internal[ca] += 1,
            _ => {}
        }
    }

    internal
        .iter()
        .zip(&degree_sum)
        .map(|(&l, &d)| l as f64 / m - (d as f64 / (2.0 * m)).powi(2))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::types::Relation;

    fn graph(pairs: &[(&str, &str)]) -> RelationGraph {
        let relations: Vec<Relation> = pairs.iter().map(|(a, b)| Relation::new(a, b)).collect();
        GraphBuilder::from_relations(&relations)
    }

    fn two_triangles() -> RelationGraph {
        graph(&[
            ("a", "b"),
            ("b", "c"),
            ("c", "a"),
            ("c", "d"),
            ("d", "e"),
            ("e", "f"),
            ("f", "d"),
        ])
    }

    #[test]
    fn test_two_triangles_split_at_bridge() {
        let graph = two_triangles();
        let partition = detect_communities(&graph);

        assert_eq!(partition.cluster_count(), 2);
        assert_eq!(partition.clusters(), vec![vec![0, 1, 2], vec![3, 4, 5]]);
        assert!(modularity(&graph, &partition) > 0.35);
    }

    #[test]
    fn test_edgeless_graph_has_empty_partition() {
        let partition = detect_communities(&RelationGraph::new());
        assert!(partition.is_empty());
        assert_eq!(partition.cluster_of(0), None);
    }

    #[test]
    fn test_isolates_become_singletons() {
        let mut graph = two_triangles();
        graph.intern("loner", "Loner".into(), "Loner");
        let partition = detect_communities(&graph);

        assert_eq!(partition.cluster_count(), 3);
        assert_eq!(partition.cluster_of(6), Some(2));
    }

    #[test]
    fn test_partition_covers_every_node_once() {
        let graph = graph(&[("a", "b"), ("b", "c"), ("d", "e"), ("e", "a"), ("f", "g")]);
        let partition = detect_communities(&graph);

        let mut seen: Vec<usize> = partition.clusters().into_iter().flatten().collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..graph.node_count()).collect::<Vec<_>>());
    }

    #[test]
    fn test_merging_never_lowers_modularity() {
        let graph = two_triangles();
        let singletons = Partition {
            cluster_of: (0..graph.node_count()).collect(),
            cluster_count: graph.node_count(),
        };
        let partition = detect_communities(&graph);
        assert!(modularity(&graph, &partition) > modularity(&graph, &singletons));
    }
}
