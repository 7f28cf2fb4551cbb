//! Document chunking

use crate::types::DocumentStats;

/// Default chunk size in characters
pub const DEFAULT_CHUNK_SIZE: usize = 2400;

/// Replace every line break with a single space
pub fn collapse_newlines(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Split text into contiguous chunks of `chunk_size` characters
///
/// Newlines are collapsed first. Chunks do not overlap and ignore sentence
/// boundaries; the last chunk may be shorter. A zero size is treated as 1.
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<String> {
    let chunk_size = chunk_size.max(1);
    let collapsed = collapse_newlines(text);
    let chars: Vec<char> = collapsed.chars().collect();
    chars
        .chunks(chunk_size)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Character, word and chunk counts for a document
pub fn document_stats(text: &str, chunk_size: usize) -> DocumentStats {
    let characters = collapse_newlines(text).chars().count();
    let chunk_size = chunk_size.max(1);
    DocumentStats {
        characters,
        words: text.split_whitespace().count(),
        chunks: characters.div_ceil(chunk_size),
    }
}
