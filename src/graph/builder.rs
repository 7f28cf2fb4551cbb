//! Relation stream → graph

use crate::types::{display_label, normalize_key, OccurrenceCounts, Relation};

use super::RelationGraph;

/// Incremental builder for a [`RelationGraph`]
///
/// Node order is first-seen order, so building twice from the same
/// relations yields identical indices.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: RelationGraph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one relation; returns true if it created a new edge
    ///
    /// Self-loops are ignored and leave no node behind.
    pub fn add_relation(&mut self, relation: &Relation) -> bool {
        let (key_1, key_2) = relation.keys();
        if key_1.is_empty() || key_2.is_empty() || key_1 == key_2 {
            return false;
        }

        let a = self.graph.intern(&key_1, display_label(&key_1), &relation.object_1);
        let b = self.graph.intern(&key_2, display_label(&key_2), &relation.object_2);
        self.graph.insert_edge(a, b)
    }

    pub fn build(self) -> RelationGraph {
        self.graph
    }

    pub fn from_relations<'a, I>(relations: I) -> RelationGraph
    where
        I: IntoIterator<Item = &'a Relation>,
    {
        let mut builder = Self::new();
        for relation in relations {
            builder.add_relation(relation);
        }
        builder.build()
    }
}

/// How often each object appears across all relations, repeats included
///
/// Keyed by display label; spellings that fold to one key are counted
/// together.
pub fn occurrence_counts<'a, I>(relations: I) -> OccurrenceCounts
where
    I: IntoIterator<Item = &'a Relation>,
{
    let mut counts = OccurrenceCounts::new();
    for relation in relations {
        if relation.is_self_loop() {
            continue;
        }
        for name in [&relation.object_1, &relation.object_2] {
            let key = normalize_key(name);
            if key.is_empty() {
                continue;
            }
            *counts.entry(display_label(&key)).or_insert(0) += 1;
        }
    }
    counts
}
