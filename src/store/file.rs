//! File-based snapshot backend.
//!
//! Stores the full history as one JSON array. This is the default mode of
//! operation: a single small file next to the catalog, readable by other
//! tooling.

use std::fs;
use std::path::{Path, PathBuf};

use super::{Snapshot, SnapshotBackend};
use crate::error::BoardError;

/// A backend that keeps snapshot rows in a JSON array file.
///
/// A missing file is an empty history (first run), not an error. Read,
/// parse and write failures surface as
/// [`BoardError::PersistenceUnavailable`]; the store degrades to an empty
/// display instead of crashing.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    description: String,
}

impl FileBackend {
    /// Create a file backend for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self { path, description }
    }

    /// Returns the path being used for storage.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(stage: &str, err: impl std::fmt::Display) -> BoardError {
        BoardError::PersistenceUnavailable(format!("{}: {}", stage, err))
    }
}

impl SnapshotBackend for FileBackend {
    fn insert_rows(&mut self, rows: &[Snapshot]) -> Result<(), BoardError> {
        // Read-modify-write of the whole array; the file stays small
        // (one row per metric per board meeting).
        let mut all = self.select_all()?;
        all.extend_from_slice(rows);

        let json = serde_json::to_string_pretty(&all)
            .map_err(|e| Self::unavailable("serialize", e))?;
        fs::write(&self.path, json).map_err(|e| Self::unavailable("write", e))
    }

    fn select_all(&self) -> Result<Vec<Snapshot>, BoardError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content =
            fs::read_to_string(&self.path).map_err(|e| Self::unavailable("read", e))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|e| Self::unavailable("parse", e))
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::snap;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_missing_file_is_empty_history() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::new(dir.path().join("kpi_snapshots.json"));

        assert!(backend.select_all().unwrap().is_empty());
    }

    #[test]
    fn test_insert_then_select_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut backend = FileBackend::new(dir.path().join("kpi_snapshots.json"));

        backend.insert_rows(&[snap(1, "A", 10.0), snap(2, "B", 20.0)]).unwrap();
        backend.insert_rows(&[snap(3, "A", 30.0)]).unwrap();

        let rows = backend.select_all().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].metric, "A");
        assert_eq!(rows[2].value, 30.0);
    }

    #[test]
    fn test_corrupt_file_is_persistence_unavailable() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let backend = FileBackend::new(file.path());
        let err = backend.select_all().unwrap_err();
        match err {
            BoardError::PersistenceUnavailable(msg) => assert!(msg.contains("parse")),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_empty_file_is_empty_history() {
        let file = NamedTempFile::new().unwrap();
        let backend = FileBackend::new(file.path());
        assert!(backend.select_all().unwrap().is_empty());
    }

    #[test]
    fn test_description_names_the_file() {
        let backend = FileBackend::new("/tmp/kpi.json");
        assert_eq!(backend.description(), "file: /tmp/kpi.json");
    }
}
