//! Line filter for raw model output
//!
//! A fraction of generated lines is always off-format (prose, numbering,
//! three-way lists). Lines are accepted only when they reduce to exactly two
//! short entity names separated by a semicolon; everything else is dropped
//! without an error.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::{Relation, RELATION_SEPARATOR};

/// Maximum number of whitespace-separated tokens in one entity name
pub const MAX_NAME_TOKENS: usize = 3;

fn ordinal_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\s*").expect("ordinal marker pattern is valid"))
}

fn bullet_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-\s*").expect("bullet marker pattern is valid"))
}

/// Characters that survive cleaning
///
/// ASCII Latin letters, letters of the Cyrillic block, whitespace and the
/// field separator.
pub fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphabetic()
        || (('\u{0400}'..='\u{04FF}').contains(&c) && c.is_alphabetic())
        || c.is_whitespace()
        || c == RELATION_SEPARATOR
}

/// Strip list markers and disallowed characters, then trim
pub fn clean_line(line: &str) -> String {
    let line = ordinal_marker().replace(line, "");
    let line = bullet_marker().replace(&line, "");
    line.chars()
        .filter(|&c| is_allowed_char(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Filter and normalize one line of model output
///
/// Returns the cleaned pair when the line is accepted. Self-loops pass the
/// filter; the graph builder discards them.
pub fn filter_line(line: &str) -> Option<Relation> {
    let cleaned = clean_line(line);
    if !cleaned.contains(RELATION_SEPARATOR) {
        return None;
    }

    let parts: Vec<&str> = cleaned.split(RELATION_SEPARATOR).map(str::trim).collect();
    if parts.len() != 2 {
        return None;
    }

    for part in &parts {
        if part.is_empty() || part.split_whitespace().count() > MAX_NAME_TOKENS {
            return None;
        }
    }

    Some(Relation::new(parts[0], parts[1]))
}

/// Accept/reject decision for one line
pub fn accept_line(line: &str) -> bool {
    filter_line(line).is_some()
}

/// Apply the filter to every line of a multi-line model response
pub fn filter_output(raw: &str) -> Vec<Relation> {
    raw.lines().filter_map(filter_line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_pair() {
        let relation = filter_line("John; Mary").unwrap();
        assert_eq!(relation, Relation::new("John", "Mary"));
    }

    #[test]
    fn test_strips_ordinal_and_bullet_markers() {
        assert_eq!(filter_line("12. John; Mary").unwrap().to_line(), "John; Mary");
        assert_eq!(filter_line("- John; Mary").unwrap().to_line(), "John; Mary");
        assert_eq!(filter_line("3.John Smith;Mary").unwrap().to_line(), "John Smith; Mary");
    }

    #[test]
    fn test_removes_punctuation_and_digits() {
        let relation = filter_line("**John** (CEO); Mary-Ann 2nd").unwrap();
        assert_eq!(relation.object_1, "John CEO");
        assert_eq!(relation.object_2, "MaryAnn nd");
    }

    #[test]
    fn test_keeps_cyrillic_letters() {
        let relation = filter_line("1. Тарас Шевченко; Іван Франко").unwrap();
        assert_eq!(relation.object_1, "Тарас Шевченко");
        assert_eq!(relation.object_2, "Іван Франко");
    }

    #[test]
    fn test_rejects_missing_separator() {
        assert!(!accept_line("John and Mary"));
        assert!(!accept_line(""));
        assert!(!accept_line("   "));
    }

    #[test]
    fn test_rejects_wrong_part_count() {
        assert!(!accept_line("John; Mary; Paul"));
        assert!(!accept_line("John;"));
        assert!(!accept_line("; Mary"));
        assert!(!accept_line(";"));
    }

    #[test]
    fn test_rejects_sentences() {
        assert!(!accept_line("1. John Smith Works Very Closely; Paul"));
        assert!(!accept_line("John; the man who met Mary"));
        assert!(accept_line("John Ronald Tolkien; Paul"));
    }

    #[test]
    fn test_separator_only_survives_cleaning_when_present() {
        // Parts made only of removed characters become empty
        assert!(!accept_line("123; 456"));
    }

    #[test]
    fn test_filter_output_keeps_order() {
        let raw = "Here are the pairs:\n1. John; Mary\n2. Mary; Paul\nThat's all.";
        let lines: Vec<String> = filter_output(raw).iter().map(Relation::to_line).collect();
        assert_eq!(lines, vec!["John; Mary", "Mary; Paul"]);
    }
}
