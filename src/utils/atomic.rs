//! Atomic file writes for exported artifacts
//!
//! Content goes to a sibling `.tmp` file, is synced, then renamed over the
//! destination, so readers see either the previous file or the complete
//! new one.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub type AtomicResult<T> = Result<T, AtomicError>;

#[derive(Debug, Error)]
pub enum AtomicError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("destination has no file name: {}", .0.display())]
    NoFileName(PathBuf),
}

/// Atomically write a file through `write_fn`
///
/// Parent directories are created as needed.
///
/// ```ignore
/// atomic_write_with("csv/doc_connections.csv", |file| {
///     writeln!(file, "Source,Target,Strength")?;
///     Ok(())
/// })?;
/// ```
pub fn atomic_write_with<P, F>(path: P, write_fn: F) -> AtomicResult<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let path = path.as_ref();
    if path.file_name().is_none() {
        return Err(AtomicError::NoFileName(path.to_path_buf()));
    }
    let temp_path = path.with_extension("tmp");

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(&temp_path)?;
    if let Err(e) = write_fn(&mut file).and_then(|_| file.sync_all()) {
        drop(file);
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    fs::rename(&temp_path, path)?;
    Ok(())
}

/// Remove `.tmp` leftovers of interrupted writes; returns how many
pub fn cleanup_temp_files<P: AsRef<Path>>(dir: P) -> AtomicResult<usize> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(0);
    }

    let mut cleaned = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().map(|e| e == "tmp").unwrap_or(false) {
            fs::remove_file(&path)?;
            cleaned += 1;
        }
    }
    Ok(cleaned)
}
