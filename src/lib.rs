// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # kpiboard
//!
//! A terminal dashboard and library for a board-level KPI scorecard.
//!
//! A fixed catalog of metrics — each with a target, a warning threshold and
//! a directionality — is periodically updated through an entry form. The
//! tool classifies every metric's latest value into a three-level status,
//! keeps an append-only history of snapshots, and renders colored metric
//! cards, trend sparklines, and a risk summary.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Application                           │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐  │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│  │
//! │  │ (state) │    │(classify/│    │(render) │    │         │  │
//! │  └────┬────┘    │  board)  │    └─────────┘    └─────────┘  │
//! │       │         └──────────┘                                 │
//! │       ▼                                                      │
//! │  ┌─────────┐                                                 │
//! │  │  store  │◀── FileBackend | MemoryBackend                  │
//! │  │(history)│                                                 │
//! │  └─────────┘                                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`catalog`]**: the immutable metric catalog (names, categories,
//!   targets, warning thresholds, directions), built-in or from a config file
//! - **[`store`]**: the append-only [`SnapshotStore`] over a
//!   [`SnapshotBackend`] (JSON file or in-memory), with latest-per-metric
//!   and per-metric-series queries
//! - **[`data`]**: the pure classifier and the board assembly (cards, trend
//!   points, risk summary)
//! - **[`app`] / [`events`] / [`ui`]**: TUI state, key handling, and
//!   ratatui rendering
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Run the dashboard against the default snapshot file
//! kpiboard
//!
//! # Custom store and catalog, non-interactive export
//! kpiboard --store club.json --catalog catalog.toml --export state.json
//! ```
//!
//! ### As a library
//!
//! ```
//! use kpiboard::{classify, App, Catalog, Direction, MemoryBackend, Status};
//!
//! assert_eq!(classify(850.0, 900.0, 820.0, Direction::Up), Status::Warning);
//!
//! let app = App::new(Catalog::board_defaults(), Box::new(MemoryBackend::new()));
//! assert_eq!(app.catalog.metric_count(), 16);
//! ```

pub mod app;
pub mod catalog;
pub mod data;
pub mod error;
pub mod events;
pub mod store;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, EntryForm, View};
pub use catalog::{Catalog, Category, MetricDefinition};
pub use data::{classify, BoardData, Direction, DisplayStatus, MetricCard, RiskSummary, Status};
pub use error::BoardError;
pub use store::{FileBackend, MemoryBackend, Snapshot, SnapshotBackend, SnapshotStore};
