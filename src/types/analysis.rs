//! Analysis run types

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What kind of relations an extraction run asks the model for
///
/// The intent only changes the prompt on the model side and the names of
/// the output files; the runner logic is identical for all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    RelatedPeople,
    InfluentialPeople,
    RelatedConcepts,
}

impl Intent {
    /// All intents, in menu order
    pub const ALL: [Intent; 3] = [
        Intent::RelatedPeople,
        Intent::InfluentialPeople,
        Intent::RelatedConcepts,
    ];

    /// Stable identifier used in file names and on the wire
    pub fn slug(&self) -> &'static str {
        match self {
            Intent::RelatedPeople => "related_people",
            Intent::InfluentialPeople => "influential_people",
            Intent::RelatedConcepts => "related_concepts",
        }
    }

    /// Human readable description
    pub fn description(&self) -> &'static str {
        match self {
            Intent::RelatedPeople => "Discover related people by name",
            Intent::InfluentialPeople => "Identify the most influential individuals",
            Intent::RelatedConcepts => "Discover related concepts",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .into_iter()
            .find(|intent| intent.slug().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "Unknown intent '{}'. Expected one of: related_people, influential_people, related_concepts",
                    s
                )
            })
    }
}

/// Lifecycle state of an analysis run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Completed,
    Cancelled,
    Failed(String),
}

impl RunStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, RunStatus::Running)
    }
}

/// Size figures of the analysed document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub characters: usize,
    pub words: usize,
    pub chunks: usize,
}

/// Point-in-time view of a run, safe to hand to a polling client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    #[serde(rename = "runId")]
    pub run_id: u64,
    pub intent: Intent,
    pub document: String,
    pub progress: u8,
    #[serde(rename = "chunksDone")]
    pub chunks_done: usize,
    #[serde(rename = "totalChunks")]
    pub total_chunks: usize,
    pub running: bool,
    pub status: RunStatus,
}

/// Outcome of a finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub intent: Intent,
    pub document: String,
    pub status: RunStatus,
    #[serde(rename = "chunksProcessed")]
    pub chunks_processed: usize,
    pub stats: DocumentStats,
    #[serde(rename = "acceptedLines")]
    pub accepted_lines: usize,
    #[serde(rename = "rawOutput")]
    pub raw_output: PathBuf,
    #[serde(rename = "filteredOutput")]
    pub filtered_output: PathBuf,
    #[serde(rename = "startedAt")]
    pub started_at: i64,
    #[serde(rename = "finishedAt")]
    pub finished_at: i64,
}
