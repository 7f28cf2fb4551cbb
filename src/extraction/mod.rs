//! Extraction capability
//!
//! The analysis runner only needs one thing from the language-model side:
//! given a chunk of text, return the raw multi-line answer. Prompt
//! construction and the remote call live behind the [`Extractor`] trait.

mod command;

pub use command::CommandExtractor;

use thiserror::Error;

/// Errors raised by an extraction call
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("extraction call failed: {0}")]
    Failed(String),

    #[error("extractor process error: {0}")]
    Io(#[from] std::io::Error),

    #[error("extractor exited with {status}: {stderr}")]
    NonZeroExit { status: String, stderr: String },

    #[error("extractor returned non UTF-8 output")]
    InvalidOutput,
}

/// Turns one chunk of document text into raw `"A; B"` lines
///
/// Implementations may be slow and may fail; the runner calls them from a
/// background thread, one chunk at a time.
pub trait Extractor: Send + Sync {
    fn extract(&self, chunk: &str) -> Result<String, ExtractionError>;
}

impl<F> Extractor for F
where
    F: Fn(&str) -> Result<String, ExtractionError> + Send + Sync,
{
    fn extract(&self, chunk: &str) -> Result<String, ExtractionError> {
        self(chunk)
    }
}
