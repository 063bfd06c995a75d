//! In-memory snapshot backend.
//!
//! Keeps rows in a plain `Vec`. Used by tests and by library consumers that
//! want a board without durable history.

use super::{Snapshot, SnapshotBackend};
use crate::error::BoardError;

/// A backend that stores rows in process memory only.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    rows: Vec<Snapshot>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-populated with rows.
    pub fn with_rows(rows: Vec<Snapshot>) -> Self {
        Self { rows }
    }
}

impl SnapshotBackend for MemoryBackend {
    fn insert_rows(&mut self, rows: &[Snapshot]) -> Result<(), BoardError> {
        self.rows.extend_from_slice(rows);
        Ok(())
    }

    fn select_all(&self) -> Result<Vec<Snapshot>, BoardError> {
        Ok(self.rows.clone())
    }

    fn description(&self) -> &str {
        "memory (not persisted)"
    }
}
