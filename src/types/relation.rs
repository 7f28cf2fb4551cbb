//! Relation types for the relationship graph

use serde::{Deserialize, Serialize};

/// Field separator of the relation file format
pub const RELATION_SEPARATOR: char = ';';

/// Ordered pair of entity names extracted from text
///
/// Both names are stored trimmed but otherwise as written. Graph identity
/// uses [`normalize_key`], so `"JOHN"` and `" john "` land on the same node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    #[serde(rename = "object1")]
    pub object_1: String,
    #[serde(rename = "object2")]
    pub object_2: String,
}

impl Relation {
    /// Create a new relation, trimming both names
    pub fn new(object_1: impl AsRef<str>, object_2: impl AsRef<str>) -> Self {
        Self {
            object_1: object_1.as_ref().trim().to_string(),
            object_2: object_2.as_ref().trim().to_string(),
        }
    }

    /// Parse one line of a relation file
    ///
    /// Returns `None` unless the line splits into exactly two non-empty
    /// fields naming two different entities.
    pub fn parse_line(line: &str) -> Option<Self> {
        let mut parts = line.split(RELATION_SEPARATOR);
        let first = parts.next()?.trim();
        let second = parts.next()?.trim();
        if parts.next().is_some() || first.is_empty() || second.is_empty() {
            return None;
        }

        let relation = Self::new(first, second);
        if relation.is_self_loop() {
            return None;
        }
        Some(relation)
    }

    /// Normalized node keys of both endpoints
    pub fn keys(&self) -> (String, String) {
        (normalize_key(&self.object_1), normalize_key(&self.object_2))
    }

    /// True when both endpoints fold to the same node
    pub fn is_self_loop(&self) -> bool {
        normalize_key(&self.object_1) == normalize_key(&self.object_2)
    }

    /// Render in the `"A; B"` line format
    pub fn to_line(&self) -> String {
        format!("{}{} {}", self.object_1, RELATION_SEPARATOR, self.object_2)
    }
}

/// Fold a raw entity name into its node key
///
/// Trims, collapses whitespace runs to one space, and lowercases.
pub fn normalize_key(name: &str) -> String {
    name.split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Title-cased display form of a node key
pub fn display_label(key: &str) -> String {
    key.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_trims_fields() {
        let relation = Relation::parse_line("  John ;  Mary  ").unwrap();
        assert_eq!(relation.object_1, "John");
        assert_eq!(relation.object_2, "Mary");
    }

    #[test]
    fn test_parse_line_rejects_wrong_field_count() {
        assert!(Relation::parse_line("John").is_none());
        assert!(Relation::parse_line("John; Mary; Paul").is_none());
        assert!(Relation::parse_line("John; ").is_none());
        assert!(Relation::parse_line("").is_none());
    }

    #[test]
    fn test_parse_line_drops_self_loops_after_folding() {
        assert!(Relation::parse_line("John; john").is_none());
        assert!(Relation::parse_line("John  Smith; john smith").is_none());
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("  John   SMITH "), "john smith");
        assert_eq!(normalize_key("Шевченко"), "шевченко");
    }

    #[test]
    fn test_display_label() {
        assert_eq!(display_label("john smith"), "John Smith");
        assert_eq!(display_label("іван франко"), "Іван Франко");
        assert_eq!(display_label(""), "");
    }

    #[test]
    fn test_to_line() {
        assert_eq!(Relation::new(" A ", "B").to_line(), "A; B");
    }
}
