//! Relation Store - read side of the pipeline
//!
//! Relation files written by the analysis runner are the only durable
//! state. Every query here re-reads the file and rebuilds what it needs;
//! nothing is cached between requests.

mod export;
mod query;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::graph::DEFAULT_LAYOUT_SEED;
use crate::types::{
    DegreeTable, GraphView, Metric, ObjectCount, OccurrenceCounts, Relation,
};
use crate::utils::AtomicError;
use crate::visual::{build_view, ColorError, ViewOptions};

pub use export::{connections_file_name, CONNECTIONS_HEADER, UNWEIGHTED_STRENGTH};
pub use query::{DEFAULT_MIN_COUNT, DEFAULT_TOP_N};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    InvalidColor(#[from] ColorError),

    #[error("export failed: {0}")]
    Export(#[from] AtomicError),
}

/// Queries over the relation files of one output directory
#[derive(Debug, Clone)]
pub struct RelationStore {
    filtered_dir: PathBuf,
    export_dir: PathBuf,
    layout_seed: u64,
}

impl RelationStore {
    pub fn new(filtered_dir: impl Into<PathBuf>, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            filtered_dir: filtered_dir.into(),
            export_dir: export_dir.into(),
            layout_seed: DEFAULT_LAYOUT_SEED,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.filtered_dir, &config.export_dir).with_layout_seed(config.layout_seed)
    }

    pub fn with_layout_seed(mut self, seed: u64) -> Self {
        self.layout_seed = seed;
        self
    }

    pub fn filtered_dir(&self) -> &Path {
        &self.filtered_dir
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    pub fn layout_seed(&self) -> u64 {
        self.layout_seed
    }

    /// View options with this store's layout seed
    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            seed: self.layout_seed,
            ..ViewOptions::default()
        }
    }

    /// Locate a relation file; bare names are looked up in the filtered dir
    pub fn resolve(&self, relation_file: &str) -> Result<PathBuf, StoreError> {
        let candidate = Path::new(relation_file);
        let path = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.filtered_dir.join(candidate)
        };

        if !path.is_file() {
            return Err(StoreError::NotFound(path));
        }
        Ok(path)
    }

    /// Every well-formed relation of a file, in file order
    pub fn load_relations(&self, relation_file: &str) -> Result<Vec<Relation>, StoreError> {
        let path = self.resolve(relation_file)?;
        let content = fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        let relations: Vec<Relation> = content.lines().filter_map(Relation::parse_line).collect();
        debug!(file = %path.display(), relations = relations.len(), "relations loaded");
        Ok(relations)
    }

    /// Names of the files in the filtered dir, sorted; empty if it is missing
    pub fn list_relation_files(&self) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.filtered_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.filtered_dir.clone(),
                    source,
                })
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: self.filtered_dir.clone(),
                source,
            })?;
            if entry.path().is_file() {
                names.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn build_graph_view(&self, relation_file: &str, options: &ViewOptions) -> Result<GraphView, StoreError> {
        let relations = self.load_relations(relation_file)?;
        Ok(build_view(&relations, options))
    }

    pub fn degree_table(&self, relation_file: &str) -> Result<DegreeTable, StoreError> {
        let relations = self.load_relations(relation_file)?;
        Ok(query::degree_table(&relations))
    }

    pub fn occurrence_counts(&self, relation_file: &str) -> Result<OccurrenceCounts, StoreError> {
        let relations = self.load_relations(relation_file)?;
        Ok(crate::graph::occurrence_counts(&relations))
    }

    pub fn frequent_objects(
        &self,
        relation_file: &str,
        metric: Metric,
        min_count: usize,
        top_n: usize,
    ) -> Result<Vec<ObjectCount>, StoreError> {
        let relations = self.load_relations(relation_file)?;
        Ok(query::frequent_objects(&relations, metric, min_count, top_n))
    }

    /// Write the edges of the file's graph view as CSV; returns the path
    pub fn export_connections(&self, relation_file: &str, options: &ViewOptions) -> Result<PathBuf, StoreError> {
        let view = self.build_graph_view(relation_file, options)?;
        let target = self.export_dir.join(connections_file_name(relation_file));
        export::write_connections(&target, &view)?;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with(files: &[(&str, &str)]) -> (TempDir, RelationStore) {
        let dir = TempDir::new().unwrap();
        let filtered = dir.path().join("filtered");
        fs::create_dir_all(&filtered).unwrap();
        for (name, content) in files {
            fs::write(filtered.join(name), content).unwrap();
        }
        let store = RelationStore::new(filtered, dir.path().join("csv"));
        (dir, store)
    }

    #[test]
    fn test_load_skips_malformed_lines() {
        let (_dir, store) = store_with(&[("rel.txt", "John; Mary\nno separator\nA; B; C\nAnna; anna\n ; Paul\nMary;Paul\n")]);
        let relations = store.load_relations("rel.txt").unwrap();
        assert_eq!(relations, vec![Relation::new("John", "Mary"), Relation::new("Mary", "Paul")]);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let (_dir, store) = store_with(&[]);
        let err = store.degree_table("nope.txt").unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(err.to_string().starts_with("File not found"));
    }

    #[test]
    fn test_list_relation_files_sorted() {
        let (_dir, store) = store_with(&[("b.txt", ""), ("a.txt", "")]);
        assert_eq!(store.list_relation_files().unwrap(), vec!["a.txt", "b.txt"]);

        let missing = RelationStore::new("/definitely/not/here", "/tmp");
        assert!(missing.list_relation_files().unwrap().is_empty());
    }

    #[test]
    fn test_empty_file_gives_empty_results() {
        let (_dir, store) = store_with(&[("empty.txt", "")]);
        assert!(store.degree_table("empty.txt").unwrap().is_empty());
        assert!(store.occurrence_counts("empty.txt").unwrap().is_empty());
        assert!(store.build_graph_view("empty.txt", &store.view_options()).unwrap().is_empty());
    }
}
