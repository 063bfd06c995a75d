//! Error taxonomy for the KPI board.
//!
//! Nothing here is fatal to the process: validation failures keep the entry
//! form open with a message, and persistence failures degrade the board to
//! an empty history.

use thiserror::Error;

/// Errors surfaced to the user.
#[derive(Debug, Error)]
pub enum BoardError {
    /// A form field could not be read as a number. The whole submission is
    /// rejected and nothing is persisted.
    #[error("invalid value for {metric} ({field}): {input:?}")]
    InvalidMetricValue {
        metric: String,
        field: &'static str,
        input: String,
    },

    /// The persistence backend failed to read or write. The board falls
    /// back to an empty history.
    #[error("persistence unavailable: {0}")]
    PersistenceUnavailable(String),
}
