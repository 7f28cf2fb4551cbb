//! Per-run shared state and the caller-facing handle

use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::Mutex;

use crate::types::{Intent, ProgressSnapshot, RunReport, RunStatus};

use super::output::OutputPaths;
use super::AnalysisError;

/// State shared between one background run and any number of readers
///
/// Only the worker writes progress and status; readers poll. The stop flag
/// is the one field a reader may set.
#[derive(Debug)]
pub struct RunContext {
    progress: AtomicU8,
    running: AtomicBool,
    stop: AtomicBool,
    chunks_done: AtomicUsize,
    total_chunks: AtomicUsize,
    status: Mutex<RunStatus>,
}

impl RunContext {
    /// Fresh context, marked running so a cancel issued before the worker
    /// picks up its first chunk is honoured
    pub fn new() -> Self {
        Self {
            progress: AtomicU8::new(0),
            running: AtomicBool::new(true),
            stop: AtomicBool::new(false),
            chunks_done: AtomicUsize::new(0),
            total_chunks: AtomicUsize::new(0),
            status: Mutex::new(RunStatus::Running),
        }
    }

    /// Percentage of chunks completed, 0..=100
    pub fn progress(&self) -> u8 {
        self.progress.load(Ordering::Acquire)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn status(&self) -> RunStatus {
        self.status.lock().clone()
    }

    pub fn chunks_done(&self) -> usize {
        self.chunks_done.load(Ordering::Acquire)
    }

    pub fn total_chunks(&self) -> usize {
        self.total_chunks.load(Ordering::Acquire)
    }

    /// Ask the worker to stop before its next chunk
    ///
    /// Returns false when the run had already finished.
    pub fn request_cancel(&self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.stop.store(true, Ordering::Release);
        true
    }

    pub(crate) fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    pub(crate) fn set_total(&self, total: usize) {
        self.total_chunks.store(total, Ordering::Release);
        if total == 0 {
            self.progress.store(100, Ordering::Release);
        }
    }

    pub(crate) fn record_chunk_done(&self, done: usize) {
        let total = self.total_chunks().max(1);
        let percent = (done * 100 / total).min(100) as u8;
        self.chunks_done.store(done, Ordering::Release);
        self.progress.fetch_max(percent, Ordering::AcqRel);
    }

    pub(crate) fn set_status(&self, status: RunStatus) {
        *self.status.lock() = status;
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears the running and stop flags on every exit path of a worker,
/// panics included
pub(crate) struct RunningGuard {
    context: Arc<RunContext>,
}

impl RunningGuard {
    pub(crate) fn new(context: Arc<RunContext>) -> Self {
        Self { context }
    }
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        {
            let mut status = self.context.status.lock();
            if !status.is_finished() {
                *status = RunStatus::Failed("analysis worker stopped unexpectedly".to_string());
            }
        }
        self.context.stop.store(false, Ordering::Release);
        self.context.running.store(false, Ordering::Release);
    }
}

/// Handle to one background analysis run
///
/// Every method except [`AnalysisHandle::wait`] returns immediately.
pub struct AnalysisHandle {
    id: u64,
    intent: Intent,
    document: String,
    paths: OutputPaths,
    context: Arc<RunContext>,
    worker: Mutex<Option<JoinHandle<Result<RunReport, AnalysisError>>>>,
}

impl AnalysisHandle {
    pub(crate) fn new(
        id: u64,
        intent: Intent,
        document: String,
        paths: OutputPaths,
        context: Arc<RunContext>,
        worker: JoinHandle<Result<RunReport, AnalysisError>>,
    ) -> Self {
        Self {
            id,
            intent,
            document,
            paths,
            context,
            worker: Mutex::new(Some(worker)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn intent(&self) -> Intent {
        self.intent
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn paths(&self) -> &OutputPaths {
        &self.paths
    }

    pub fn progress(&self) -> u8 {
        self.context.progress()
    }

    pub fn is_running(&self) -> bool {
        self.context.is_running()
    }

    pub fn status(&self) -> RunStatus {
        self.context.status()
    }

    pub fn request_cancel(&self) -> bool {
        self.context.request_cancel()
    }

    pub fn context(&self) -> &Arc<RunContext> {
        &self.context
    }

    /// Snapshot for polling clients
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            run_id: self.id,
            intent: self.intent,
            document: self.document.clone(),
            progress: self.progress(),
            chunks_done: self.context.chunks_done(),
            total_chunks: self.context.total_chunks(),
            running: self.is_running(),
            status: self.status(),
        }
    }

    /// Block until the worker exits and return its report
    ///
    /// The report can be collected once; later calls fail with
    /// [`AnalysisError::AlreadyJoined`].
    pub fn wait(&self) -> Result<RunReport, AnalysisError> {
        let worker = self.worker.lock().take().ok_or(AnalysisError::AlreadyJoined)?;
        worker.join().map_err(|_| AnalysisError::WorkerPanicked)?
    }
}

impl std::fmt::Debug for AnalysisHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisHandle")
            .field("id", &self.id)
            .field("intent", &self.intent)
            .field("document", &self.document)
            .field("progress", &self.progress())
            .field("running", &self.is_running())
            .finish()
    }
}
