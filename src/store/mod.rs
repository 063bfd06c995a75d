//! Append-only snapshot storage and aggregation.
//!
//! The [`SnapshotStore`] owns the in-memory snapshot collection and answers
//! the two queries the board needs: the latest observation per metric and
//! the full time series per metric. Durability is delegated to a
//! [`SnapshotBackend`] (JSON file, or in-memory for tests).

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use std::collections::BTreeMap;
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::status::Direction;
use crate::error::BoardError;

/// One dated observation of a metric, together with the target, warning
/// threshold and direction that applied at entry time.
///
/// Snapshots are immutable once created; the collection only grows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Entry timestamp, serialized as an ISO-8601 / RFC 3339 string.
    #[serde(with = "snapshot_date")]
    pub date: DateTime<Utc>,
    pub metric: String,
    pub value: f64,
    pub target: f64,
    pub warning: f64,
    pub direction: Direction,
}

/// Serde helpers for the `date` field.
///
/// Always serializes RFC 3339. Deserialization also accepts timezone-less
/// ISO-8601 strings (the format older rows were written in) and treats them
/// as UTC.
mod snapshot_date {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&date.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(de)?;
        if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}

/// Persistence collaborator for snapshot rows.
///
/// Backends provide at-least-once appends. Deduplication, retries and
/// timeouts are out of scope; the store treats every failure as
/// [`BoardError::PersistenceUnavailable`].
pub trait SnapshotBackend: Send + Debug {
    /// Append rows to durable storage.
    fn insert_rows(&mut self, rows: &[Snapshot]) -> Result<(), BoardError>;

    /// Read every stored row.
    fn select_all(&self) -> Result<Vec<Snapshot>, BoardError>;

    /// Human-readable description of the backend, for the status bar.
    fn description(&self) -> &str;
}

/// Append-only collection of metric snapshots.
///
/// # Example
///
/// ```
/// use kpiboard::{MemoryBackend, SnapshotStore};
///
/// let mut store = SnapshotStore::new(Box::new(MemoryBackend::new()));
/// assert!(store.latest_per_metric().is_empty());
/// ```
#[derive(Debug)]
pub struct SnapshotStore {
    backend: Box<dyn SnapshotBackend>,
    snapshots: Vec<Snapshot>,
    last_error: Option<String>,
}

impl SnapshotStore {
    /// Create a store over the given backend and load existing history.
    ///
    /// A backend failure is not fatal: the store starts with an empty
    /// history and reports the error via [`SnapshotStore::last_error`].
    pub fn new(backend: Box<dyn SnapshotBackend>) -> Self {
        let mut store = Self {
            backend,
            snapshots: Vec::new(),
            last_error: None,
        };
        store.reload();
        store
    }

    /// Re-read the full history from the backend.
    ///
    /// On failure the board falls back to an empty history rather than
    /// keeping possibly stale rows.
    pub fn reload(&mut self) -> bool {
        match self.backend.select_all() {
            Ok(rows) => {
                self.snapshots = rows;
                self.last_error = None;
                true
            }
            Err(e) => {
                log::warn!("snapshot reload failed: {}", e);
                self.snapshots.clear();
                self.last_error = Some(e.to_string());
                false
            }
        }
    }

    /// Append a batch of snapshots (one per metric per submission).
    ///
    /// The batch is written to the backend first and only then added to the
    /// in-memory collection, so a backend failure leaves the store
    /// unchanged. An empty batch is a no-op. Repeated rows for the same
    /// metric and timestamp are all retained.
    pub fn append(&mut self, rows: Vec<Snapshot>) -> Result<(), BoardError> {
        if rows.is_empty() {
            return Ok(());
        }
        self.backend.insert_rows(&rows)?;
        self.snapshots.extend(rows);
        Ok(())
    }

    /// For each distinct metric name, the snapshot with the greatest
    /// timestamp. Empty store yields an empty map; callers render absent
    /// metrics as "no data yet".
    ///
    /// Written as an explicit stable sort plus fold: within equal
    /// timestamps insertion order is preserved, so the fold resolves ties
    /// as last-inserted-wins.
    pub fn latest_per_metric(&self) -> BTreeMap<String, Snapshot> {
        let mut ordered: Vec<&Snapshot> = self.snapshots.iter().collect();
        ordered.sort_by_key(|s| s.date);

        let mut latest = BTreeMap::new();
        for snap in ordered {
            latest.insert(snap.metric.clone(), snap.clone());
        }
        latest
    }

    /// All snapshots for a metric, ascending by timestamp.
    ///
    /// A series of length <= 1 has no meaningful trend; presentation code
    /// signals that instead of plotting (see `MetricCard::trend_points`).
    pub fn series_for(&self, metric: &str) -> Vec<Snapshot> {
        let mut series: Vec<Snapshot> =
            self.snapshots.iter().filter(|s| s.metric == metric).cloned().collect();
        series.sort_by_key(|s| s.date);
        series
    }

    /// Total number of stored snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// The last backend error, if the most recent operation failed.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Description of the underlying backend, for the status bar.
    pub fn description(&self) -> &str {
        self.backend.description()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn snap(date_secs: i64, metric: &str, value: f64) -> Snapshot {
        Snapshot {
            date: Utc.timestamp_opt(date_secs, 0).unwrap(),
            metric: metric.to_string(),
            value,
            target: 100.0,
            warning: 50.0,
            direction: Direction::Up,
        }
    }

    fn store_with(rows: Vec<Snapshot>) -> SnapshotStore {
        let mut store = SnapshotStore::new(Box::new(MemoryBackend::new()));
        store.append(rows).unwrap();
        store
    }

    #[test]
    fn test_latest_per_metric_takes_max_timestamp() {
        let store = store_with(vec![snap(1, "A", 10.0), snap(2, "A", 20.0)]);

        let latest = store.latest_per_metric();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest["A"].value, 20.0);
    }

    #[test]
    fn test_latest_per_metric_tie_breaks_last_inserted() {
        let store = store_with(vec![snap(5, "A", 1.0), snap(5, "A", 2.0), snap(5, "A", 3.0)]);

        let latest = store.latest_per_metric();
        assert_eq!(latest["A"].value, 3.0);
    }

    #[test]
    fn test_latest_per_metric_empty_store() {
        let store = SnapshotStore::new(Box::new(MemoryBackend::new()));
        assert!(store.latest_per_metric().is_empty());
    }

    #[test]
    fn test_append_empty_batch_is_noop() {
        let mut store = store_with(vec![snap(1, "A", 10.0)]);
        let before = store.latest_per_metric();

        store.append(Vec::new()).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.latest_per_metric(), before);
    }

    #[test]
    fn test_series_sorted_ascending_despite_insert_order() {
        let store = store_with(vec![
            snap(3, "A", 30.0),
            snap(1, "A", 10.0),
            snap(2, "B", 99.0),
            snap(2, "A", 20.0),
        ]);

        let series = store.series_for("A");
        let values: Vec<f64> = series.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_series_for_unknown_metric_is_empty() {
        let store = store_with(vec![snap(1, "A", 10.0)]);
        assert!(store.series_for("B").is_empty());
    }

    #[test]
    fn test_duplicate_submissions_are_retained() {
        let row = snap(7, "A", 42.0);
        let store = store_with(vec![row.clone(), row]);
        assert_eq!(store.series_for("A").len(), 2);
    }

    #[test]
    fn test_snapshot_wire_format() {
        let row = snap(0, "Pelaajamäärä yht.", 850.0);
        let json = serde_json::to_value(&row).unwrap();

        assert_eq!(json["metric"], "Pelaajamäärä yht.");
        assert_eq!(json["value"], 850.0);
        assert_eq!(json["direction"], "up");
        assert_eq!(json["date"], "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_snapshot_accepts_timezone_less_dates() {
        // Rows written by the earlier tooling carried naive local timestamps
        let json = r#"{
            "date": "2024-03-01T12:30:00.123456",
            "metric": "Kattavuus % (maksut/kulut)",
            "value": 102.0,
            "target": 100.0,
            "warning": 95.0,
            "direction": "up"
        }"#;

        let row: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(row.value, 102.0);
        assert_eq!(row.date.timestamp(), 1_709_296_200);
    }
}
