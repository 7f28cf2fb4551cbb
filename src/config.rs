//! Environment configuration
//!
//! Relative paths are resolved against the working directory, the same
//! way for every variable.

use std::env;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::analysis::{RunnerConfig, DEFAULT_CHUNK_SIZE};
use crate::graph::DEFAULT_LAYOUT_SEED;

pub const OUTPUT_DIR_ENV: &str = "CONNEXA_OUTPUT_DIR";
pub const FILTERED_DIR_ENV: &str = "CONNEXA_FILTERED_DIR";
pub const EXPORT_DIR_ENV: &str = "CONNEXA_EXPORT_DIR";
pub const CHUNK_SIZE_ENV: &str = "CONNEXA_CHUNK_SIZE";
pub const EXTRACTOR_CMD_ENV: &str = "CONNEXA_EXTRACTOR_CMD";
pub const LAYOUT_SEED_ENV: &str = "CONNEXA_LAYOUT_SEED";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Raw extractor output
    pub output_dir: PathBuf,
    /// Filtered relation files, the input of every graph query
    pub filtered_dir: PathBuf,
    /// Connections CSV exports
    pub export_dir: PathBuf,
    pub chunk_size: usize,
    /// Command line of the external extractor, if any
    pub extractor_command: Option<String>,
    pub layout_seed: u64,
}

impl Config {
    /// Load from the process environment
    pub fn from_env() -> Self {
        let current_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::from_lookup(&current_dir, |name| env::var(name).ok())
    }

    /// Load from an arbitrary variable source
    pub fn from_lookup<F>(base_dir: &Path, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let dir = |name: &str, default: PathBuf| match lookup(name).filter(|v| !v.trim().is_empty()) {
            Some(path) => resolve(base_dir, &path),
            None => default,
        };

        let output_dir = dir(OUTPUT_DIR_ENV, base_dir.join("output"));
        let filtered_dir = dir(FILTERED_DIR_ENV, output_dir.join("filtered"));
        let export_dir = dir(EXPORT_DIR_ENV, output_dir.join("csv"));

        let chunk_size = match lookup(CHUNK_SIZE_ENV) {
            None => DEFAULT_CHUNK_SIZE,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(size) if size > 0 => size,
                _ => {
                    warn!(value = %raw, default = DEFAULT_CHUNK_SIZE, "invalid {}, using default", CHUNK_SIZE_ENV);
                    DEFAULT_CHUNK_SIZE
                }
            },
        };

        let layout_seed = match lookup(LAYOUT_SEED_ENV) {
            None => DEFAULT_LAYOUT_SEED,
            Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
                warn!(value = %raw, default = DEFAULT_LAYOUT_SEED, "invalid {}, using default", LAYOUT_SEED_ENV);
                DEFAULT_LAYOUT_SEED
            }),
        };

        let extractor_command = lookup(EXTRACTOR_CMD_ENV).filter(|cmd| !cmd.trim().is_empty());

        Self {
            output_dir,
            filtered_dir,
            export_dir,
            chunk_size,
            extractor_command,
            layout_seed,
        }
    }

    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig::new(&self.output_dir, &self.filtered_dir).with_chunk_size(self.chunk_size)
    }
}

fn resolve(base_dir: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
