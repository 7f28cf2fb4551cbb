//! Degree and occurrence statistics types

use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One row of the degree table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreeRow {
    pub object: String,
    pub degree: usize,
}

/// Column to sort a degree table by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Degree,
    Object,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Degree per object, in graph insertion order until sorted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreeTable {
    pub rows: Vec<DegreeRow>,
}

impl DegreeTable {
    /// Create a table from rows
    pub fn new(rows: Vec<DegreeRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Stable sort by the given column
    ///
    /// Degree sorts fall back to insertion order on ties; object sorts
    /// compare labels case-insensitively.
    pub fn sort_by(&mut self, key: SortKey, order: SortOrder) {
        match (key, order) {
            (SortKey::Degree, SortOrder::Asc) => self.rows.sort_by_key(|r| r.degree),
            (SortKey::Degree, SortOrder::Desc) => self.rows.sort_by_key(|r| Reverse(r.degree)),
            (SortKey::Object, SortOrder::Asc) => {
                self.rows.sort_by_key(|r| r.object.to_lowercase())
            }
            (SortKey::Object, SortOrder::Desc) => {
                self.rows.sort_by_key(|r| Reverse(r.object.to_lowercase()))
            }
        }
    }

    /// Sorted copy of the table
    pub fn sorted(mut self, key: SortKey, order: SortOrder) -> Self {
        self.sort_by(key, order);
        self
    }

    /// Degree of a given object label
    pub fn degree_of(&self, object: &str) -> Option<usize> {
        self.rows.iter().find(|r| r.object == object).map(|r| r.degree)
    }
}

/// Raw mention count per object, keyed by display label
pub type OccurrenceCounts = BTreeMap<String, usize>;

/// Which count a frequency ranking uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Raw mentions across all relations
    #[default]
    Occurrence,
    /// Distinct neighbors in the graph
    Degree,
}

/// Object with a count, for frequency charts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectCount {
    pub object: String,
    pub count: usize,
}
