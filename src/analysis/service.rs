//! Run registry for callers that address runs by id

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::extraction::Extractor;
use crate::types::{Intent, ProgressSnapshot};

use super::{AnalysisError, AnalysisHandle, AnalysisRunner};

/// Chooses the extractor for an intent, `None` when none is configured
pub type ExtractorProvider = dyn Fn(Intent) -> Option<Arc<dyn Extractor>> + Send + Sync;

/// Finished runs kept for polling before the oldest are forgotten
pub const DEFAULT_RUN_HISTORY: usize = 32;

/// Keeps runs started through it, so polling clients can find them
///
/// Running analyses are always kept; only the newest `history` finished
/// ones survive the next start.
pub struct AnalysisService {
    runner: AnalysisRunner,
    provider: Box<ExtractorProvider>,
    runs: RwLock<BTreeMap<u64, Arc<AnalysisHandle>>>,
    history: usize,
}

impl AnalysisService {
    pub fn new(runner: AnalysisRunner, provider: Box<ExtractorProvider>) -> Self {
        Self {
            runner,
            provider,
            runs: RwLock::new(BTreeMap::new()),
            history: DEFAULT_RUN_HISTORY,
        }
    }

    pub fn with_history(mut self, history: usize) -> Self {
        self.history = history;
        self
    }

    pub fn runner(&self) -> &AnalysisRunner {
        &self.runner
    }

    /// Start a run with the extractor configured for `intent`
    pub fn start_analysis(
        &self,
        document_text: String,
        document_name: &str,
        intent: Intent,
    ) -> Result<Arc<AnalysisHandle>, AnalysisError> {
        let extractor = (self.provider)(intent).ok_or(AnalysisError::NoExtractor(intent))?;
        let handle = Arc::new(self.runner.start(document_text, document_name, intent, extractor)?);
        let mut runs = self.runs.write();
        runs.insert(handle.id(), handle.clone());
        prune_finished(&mut runs, self.history);
        Ok(handle)
    }

    pub fn get(&self, run_id: u64) -> Option<Arc<AnalysisHandle>> {
        self.runs.read().get(&run_id).cloned()
    }

    pub fn progress(&self, run_id: u64) -> Option<ProgressSnapshot> {
        self.get(run_id).map(|handle| handle.snapshot())
    }

    /// `Some(true)` when a running analysis was asked to stop
    pub fn request_cancel(&self, run_id: u64) -> Option<bool> {
        self.get(run_id).map(|handle| handle.request_cancel())
    }

    /// Snapshots of all known runs, oldest first
    pub fn snapshots(&self) -> Vec<ProgressSnapshot> {
        self.runs.read().values().map(|handle| handle.snapshot()).collect()
    }

    /// Ask every running analysis to stop; returns how many were running
    pub fn cancel_all(&self) -> usize {
        let cancelled = self
            .runs
            .read()
            .values()
            .filter(|handle| handle.request_cancel())
            .count();
        if cancelled > 0 {
            info!(cancelled, "cancel requested for running analyses");
        }
        cancelled
    }
}

/// Drop the oldest finished runs beyond `keep`
fn prune_finished(runs: &mut BTreeMap<u64, Arc<AnalysisHandle>>, keep: usize) {
    let finished: Vec<u64> = runs
        .iter()
        .filter(|(_, handle)| !handle.is_running())
        .map(|(id, _)| *id)
        .collect();
    let excess = finished.len().saturating_sub(keep);
    for id in finished.into_iter().take(excess) {
        runs.remove(&id);
    }
    if excess > 0 {
        debug!(removed = excess, "forgot finished analysis runs");
    }
}
