//! Chunked analysis runner
//!
//! Drives one full-document extraction run on a background thread:
//! chunk the text, call the extractor once per chunk in source order,
//! append raw and filtered output, and publish progress through a
//! per-run [`RunContext`].

mod chunking;
mod context;
mod output;
mod service;

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::extraction::{ExtractionError, Extractor};
use crate::types::{Intent, RunReport, RunStatus};
use crate::validation::filter_output;

pub use chunking::{chunk_text, collapse_newlines, document_stats, DEFAULT_CHUNK_SIZE};
pub use context::{AnalysisHandle, RunContext};
pub use output::OutputPaths;
pub use service::{AnalysisService, ExtractorProvider};

use context::RunningGuard;
use output::{ActiveOutputs, OutputClaim, RunOutputs};

/// Errors that abort an analysis run
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("extraction failed on chunk {chunk}: {source}")]
    Extraction {
        chunk: usize,
        #[source]
        source: ExtractionError,
    },

    #[error("cannot write analysis output {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no extractor configured for intent '{0}'")]
    NoExtractor(Intent),

    #[error("failed to start analysis worker: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("analysis worker panicked")]
    WorkerPanicked,

    #[error("analysis result was already collected")]
    AlreadyJoined,

    #[error("another run is already writing {}", .0.display())]
    AlreadyRunning(PathBuf),
}

/// Runner settings
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub output_dir: PathBuf,
    pub filtered_dir: PathBuf,
    pub chunk_size: usize,
}

impl RunnerConfig {
    pub fn new(output_dir: impl Into<PathBuf>, filtered_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            filtered_dir: filtered_dir.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}

/// Starts analysis runs; each run gets its own context and thread
///
/// Runs over different documents or intents proceed concurrently. A run
/// whose output files are still being written by another is refused.
#[derive(Debug)]
pub struct AnalysisRunner {
    config: RunnerConfig,
    next_id: AtomicU64,
    active: ActiveOutputs,
}

impl AnalysisRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            next_id: AtomicU64::new(1),
            active: ActiveOutputs::default(),
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Output locations a run over `document_name` would use
    pub fn output_paths(&self, intent: Intent, document_name: &str) -> OutputPaths {
        OutputPaths::for_document(
            &self.config.output_dir,
            &self.config.filtered_dir,
            intent,
            document_name,
        )
    }

    /// Whether a run currently owns the output files of `document_name`
    pub fn is_writing(&self, intent: Intent, document_name: &str) -> bool {
        let paths = self.output_paths(intent, document_name);
        self.active.lock().contains(&paths.filtered)
    }

    /// Start a run on a background thread and return immediately
    pub fn start(
        &self,
        document_text: String,
        document_name: &str,
        intent: Intent,
        extractor: Arc<dyn Extractor>,
    ) -> Result<AnalysisHandle, AnalysisError> {
        let paths = self.output_paths(intent, document_name);
        let claim = OutputClaim::acquire(&self.active, &paths)?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let context = Arc::new(RunContext::new());

        let job = RunJob {
            document_text,
            document_name: document_name.to_string(),
            intent,
            chunk_size: self.config.chunk_size,
            paths: paths.clone(),
        };

        let worker_context = context.clone();
        let worker = thread::Builder::new()
            .name(format!("analysis-{}", id))
            .spawn(move || execute(&job, &worker_context, extractor.as_ref(), claim))
            .map_err(AnalysisError::Spawn)?;

        info!(run_id = id, %intent, document = document_name, "analysis started");
        Ok(AnalysisHandle::new(
            id,
            intent,
            document_name.to_string(),
            paths,
            context,
            worker,
        ))
    }

    /// Run to completion on the calling thread
    pub fn run(
        &self,
        document_text: &str,
        document_name: &str,
        intent: Intent,
        extractor: &dyn Extractor,
        context: Arc<RunContext>,
    ) -> Result<RunReport, AnalysisError> {
        let paths = self.output_paths(intent, document_name);
        let claim = OutputClaim::acquire(&self.active, &paths)?;
        let job = RunJob {
            document_text: document_text.to_string(),
            document_name: document_name.to_string(),
            intent,
            chunk_size: self.config.chunk_size,
            paths,
        };
        execute(&job, &context, extractor, claim)
    }
}

struct RunJob {
    document_text: String,
    document_name: String,
    intent: Intent,
    chunk_size: usize,
    paths: OutputPaths,
}

fn execute(
    job: &RunJob,
    context: &Arc<RunContext>,
    extractor: &dyn Extractor,
    claim: OutputClaim,
) -> Result<RunReport, AnalysisError> {
    let _guard = RunningGuard::new(context.clone());
    // released before the running flag clears
    let _claim = claim;
    let started_at = chrono::Utc::now().timestamp();

    let result = process_chunks(job, context, extractor);
    let status = match &result {
        Ok(outcome) if outcome.cancelled => RunStatus::Cancelled,
        Ok(_) => RunStatus::Completed,
        Err(e) => RunStatus::Failed(e.to_string()),
    };
    context.set_status(status.clone());

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(document = %job.document_name, intent = %job.intent, error = %e, "analysis failed");
            return Err(e);
        }
    };

    info!(
        document = %job.document_name,
        intent = %job.intent,
        chunks = outcome.chunks_processed,
        accepted = outcome.accepted_lines,
        ?status,
        "analysis finished"
    );

    Ok(RunReport {
        intent: job.intent,
        document: job.document_name.clone(),
        status,
        chunks_processed: outcome.chunks_processed,
        stats: document_stats(&job.document_text, job.chunk_size),
        accepted_lines: outcome.accepted_lines,
        raw_output: job.paths.raw.clone(),
        filtered_output: job.paths.filtered.clone(),
        started_at,
        finished_at: chrono::Utc::now().timestamp(),
    })
}

struct ChunkOutcome {
    chunks_processed: usize,
    accepted_lines: usize,
    cancelled: bool,
}

fn process_chunks(
    job: &RunJob,
    context: &RunContext,
    extractor: &dyn Extractor,
) -> Result<ChunkOutcome, AnalysisError> {
    let chunks = chunk_text(&job.document_text, job.chunk_size);
    context.set_total(chunks.len());

    let mut outputs = RunOutputs::create(&job.paths)?;
    let mut outcome = ChunkOutcome {
        chunks_processed: 0,
        accepted_lines: 0,
        cancelled: false,
    };

    for (index, chunk) in chunks.iter().enumerate() {
        if context.stop_requested() {
            outcome.cancelled = true;
            info!(document = %job.document_name, chunk = index, "analysis cancelled");
            break;
        }

        let raw = extractor
            .extract(chunk)
            .map_err(|source| AnalysisError::Extraction { chunk: index, source })?;
        let accepted = filter_output(&raw);
        outputs.append_chunk(&raw, &accepted)?;

        outcome.chunks_processed = index + 1;
        outcome.accepted_lines += accepted.len();
        context.record_chunk_done(index + 1);
        debug!(
            chunk = index,
            total = chunks.len(),
            accepted = accepted.len(),
            progress = context.progress(),
            "chunk processed"
        );
    }

    Ok(outcome)
}
