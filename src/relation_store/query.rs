//! Degree and frequency statistics over a relation list

use std::cmp::Reverse;

use crate::graph::{occurrence_counts, GraphBuilder};
use crate::types::{DegreeRow, DegreeTable, Metric, ObjectCount, Relation};

/// Objects must be seen more often than this to count as frequent
pub const DEFAULT_MIN_COUNT: usize = 3;
pub const DEFAULT_TOP_N: usize = 50;

/// Degree of every object in the full graph, first-seen order
pub fn degree_table(relations: &[Relation]) -> DegreeTable {
    let graph = GraphBuilder::from_relations(relations).without_isolates();
    let rows = (0..graph.node_count())
        .map(|node| DegreeRow {
            object: graph.label(node).to_string(),
            degree: graph.degree(node),
        })
        .collect();
    DegreeTable::new(rows)
}

/// Objects whose count is strictly above `min_count`, highest first,
/// at most `top_n` of them
pub fn frequent_objects(relations: &[Relation], metric: Metric, min_count: usize, top_n: usize) -> Vec<ObjectCount> {
    let mut counts: Vec<ObjectCount> = match metric {
        Metric::Occurrence => occurrence_counts(relations)
            .into_iter()
            .map(|(object, count)| ObjectCount { object, count })
            .collect(),
        Metric::Degree => degree_table(relations)
            .rows
            .into_iter()
            .map(|row| ObjectCount {
                object: row.object,
                count: row.degree,
            })
            .collect(),
    };

    counts.retain(|c| c.count > min_count);
    counts.sort_by_key(|c| Reverse(c.count));
    counts.truncate(top_n);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relations(pairs: &[(&str, &str)]) -> Vec<Relation> {
        pairs.iter().map(|(a, b)| Relation::new(a, b)).collect()
    }

    #[test]
    fn test_degree_table_matches_scenario() {
        let table = degree_table(&relations(&[("John", "Mary"), ("Mary", "Paul")]));
        assert_eq!(table.len(), 3);
        assert_eq!(table.degree_of("John"), Some(1));
        assert_eq!(table.degree_of("Mary"), Some(2));
        assert_eq!(table.degree_of("Paul"), Some(1));
    }

    #[test]
    fn test_frequency_threshold_is_strict() {
        // Mary appears 4 times, John 3 times
        let input = relations(&[("John", "Mary"), ("John", "Mary"), ("John", "Mary"), ("Mary", "Paul")]);

        let frequent = frequent_objects(&input, Metric::Occurrence, 3, 50);
        assert_eq!(frequent, vec![ObjectCount { object: "Mary".into(), count: 4 }]);

        let frequent = frequent_objects(&input, Metric::Occurrence, 0, 2);
        assert_eq!(frequent.len(), 2);
        assert_eq!(frequent[1].object, "John");
    }

    #[test]
    fn test_degree_metric_ignores_repeats() {
        let input = relations(&[("John", "Mary"), ("John", "Mary"), ("Mary", "Paul")]);
        let frequent = frequent_objects(&input, Metric::Degree, 1, 50);
        assert_eq!(frequent, vec![ObjectCount { object: "Mary".into(), count: 2 }]);
    }
}
