//! Relation file naming and writing

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::types::{Intent, Relation};

use super::AnalysisError;

/// Locations of the two relation files of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPaths {
    /// Raw model output, one paragraph per chunk
    pub raw: PathBuf,
    /// Accepted `"A; B"` lines only
    pub filtered: PathBuf,
}

impl OutputPaths {
    /// Deterministic names derived from the intent and the document file name
    pub fn for_document(
        output_dir: &Path,
        filtered_dir: &Path,
        intent: Intent,
        document_name: &str,
    ) -> Self {
        let file_name = Path::new(document_name)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| document_name.to_string());
        let raw_name = format!("output_{}_{}", intent.slug(), file_name);
        let filtered_name = format!("filtered_{}", raw_name);

        Self {
            raw: output_dir.join(raw_name),
            filtered: filtered_dir.join(filtered_name),
        }
    }
}

/// Filtered output files currently owned by a run
pub(crate) type ActiveOutputs = Arc<Mutex<HashSet<PathBuf>>>;

/// Exclusive ownership of one run's output files, released on drop
#[derive(Debug)]
pub(crate) struct OutputClaim {
    active: ActiveOutputs,
    path: PathBuf,
}

impl OutputClaim {
    /// Fails with [`AnalysisError::AlreadyRunning`] while another run writes
    /// the same files
    pub(crate) fn acquire(active: &ActiveOutputs, paths: &OutputPaths) -> Result<Self, AnalysisError> {
        if !active.lock().insert(paths.filtered.clone()) {
            return Err(AnalysisError::AlreadyRunning(paths.filtered.clone()));
        }
        Ok(Self {
            active: active.clone(),
            path: paths.filtered.clone(),
        })
    }
}

impl Drop for OutputClaim {
    fn drop(&mut self) {
        self.active.lock().remove(&self.path);
    }
}

/// Writers for both relation files, truncated on open
///
/// Each chunk is flushed as soon as it is written so a failed or cancelled
/// run leaves everything processed so far on disk.
pub(crate) struct RunOutputs {
    paths: OutputPaths,
    raw: BufWriter<File>,
    filtered: BufWriter<File>,
}

impl RunOutputs {
    pub(crate) fn create(paths: &OutputPaths) -> Result<Self, AnalysisError> {
        let raw = open_truncated(&paths.raw)?;
        let filtered = open_truncated(&paths.filtered)?;
        Ok(Self {
            paths: paths.clone(),
            raw: BufWriter::new(raw),
            filtered: BufWriter::new(filtered),
        })
    }

    /// Append the raw answer and the accepted lines of one chunk
    pub(crate) fn append_chunk(&mut self, raw: &str, accepted: &[Relation]) -> Result<(), AnalysisError> {
        write_and_flush(&mut self.raw, |w| writeln!(w, "{}", raw.trim_end()))
            .map_err(|source| output_error(&self.paths.raw, source))?;

        write_and_flush(&mut self.filtered, |w| {
            for relation in accepted {
                writeln!(w, "{}", relation.to_line())?;
            }
            Ok(())
        })
        .map_err(|source| output_error(&self.paths.filtered, source))
    }
}

fn write_and_flush<F>(writer: &mut BufWriter<File>, write_fn: F) -> io::Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    write_fn(writer)?;
    writer.flush()
}

fn open_truncated(path: &Path) -> Result<File, AnalysisError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| output_error(path, source))?;
    }
    File::create(path).map_err(|source| output_error(path, source))
}

fn output_error(path: &Path, source: io::Error) -> AnalysisError {
    AnalysisError::Output {
        path: path.to_path_buf(),
        source,
    }
}
