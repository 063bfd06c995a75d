//! Data models and processing for the KPI board.
//!
//! ## Submodules
//!
//! - [`status`]: the pure classification rule (value vs. target/warning,
//!   direction-aware) and form field parsing
//! - [`board`]: assembly of catalog + snapshot store into display-ready
//!   cards with risk aggregation
//!
//! ## Data Flow
//!
//! ```text
//! entry form ──append──▶ SnapshotStore ──latest_per_metric──▶ classify
//!                              │                                  │
//!                              └──series_for──▶ trend ──▶ BoardData (cards + risks)
//! ```

pub mod board;
pub mod status;

pub use board::{BoardData, CategoryCards, MetricCard, RiskSummary};
pub use status::{classify, parse_field, Direction, DisplayStatus, Status};
