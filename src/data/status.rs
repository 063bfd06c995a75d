//! Status classification for KPI values.
//!
//! The classifier is a pure function: a value is compared against the
//! metric's target and warning threshold, with the comparison flipped for
//! metrics where lower is better.

use serde::{Deserialize, Serialize};

use crate::error::BoardError;

/// Whether higher or lower values are better for a metric.
///
/// Serialized as `"up"` / `"down"` in snapshot rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Increasing is better (player counts, coverage percentages).
    #[serde(rename = "up")]
    Up,
    /// Decreasing is better (drop-out percentages).
    #[serde(rename = "down")]
    Down,
}

impl Direction {
    /// Flip between up and down. Used by the entry form's direction field.
    pub fn toggle(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Wire/display label.
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    /// Arrow glyph for the entry form.
    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Up => "↑",
            Direction::Down => "↓",
        }
    }
}

/// Three-level classification of a value against its thresholds.
///
/// Ordered so that `max()` aggregates toward the worst status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Status {
    Ok,
    Warning,
    Critical,
}

impl Status {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Warning => "WARN",
            Status::Critical => "CRIT",
        }
    }
}

/// Display status for a metric card.
///
/// Adds the "no data yet" state for metrics with no snapshot. `NoData` is a
/// legitimate empty state, not a classification, and renders in its own
/// neutral color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayStatus {
    Ok,
    Warning,
    Critical,
    NoData,
}

impl From<Status> for DisplayStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Ok => DisplayStatus::Ok,
            Status::Warning => DisplayStatus::Warning,
            Status::Critical => DisplayStatus::Critical,
        }
    }
}

impl DisplayStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            DisplayStatus::Ok => "OK",
            DisplayStatus::Warning => "WARN",
            DisplayStatus::Critical => "CRIT",
            DisplayStatus::NoData => "–",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DisplayStatus::Ok => "On target",
            DisplayStatus::Warning => "Warning",
            DisplayStatus::Critical => "Critical",
            DisplayStatus::NoData => "No data yet",
        }
    }
}

/// Classify a value against its target and warning threshold.
///
/// For [`Direction::Up`]: `Ok` when `value >= target`, `Warning` from the
/// warning threshold up to (excluding) the target, `Critical` below the
/// warning threshold. [`Direction::Down`] mirrors this.
///
/// # Example
///
/// ```
/// use kpiboard::{classify, Direction, Status};
///
/// // Player count: target 900, warning 820, higher is better
/// assert_eq!(classify(920.0, 900.0, 820.0, Direction::Up), Status::Ok);
/// assert_eq!(classify(850.0, 900.0, 820.0, Direction::Up), Status::Warning);
/// assert_eq!(classify(800.0, 900.0, 820.0, Direction::Up), Status::Critical);
/// ```
pub fn classify(value: f64, target: f64, warning: f64, direction: Direction) -> Status {
    match direction {
        Direction::Up => {
            if value >= target {
                Status::Ok
            } else if value >= warning {
                Status::Warning
            } else {
                Status::Critical
            }
        }
        Direction::Down => {
            if value <= target {
                Status::Ok
            } else if value <= warning {
                Status::Warning
            } else {
                Status::Critical
            }
        }
    }
}

/// Parse a form field into a number.
///
/// Accepts a decimal comma as well as a decimal point (the board enters
/// values like `4,2`). Empty or non-numeric input is an
/// [`BoardError::InvalidMetricValue`] and the submission is rejected.
pub fn parse_field(metric: &str, field: &'static str, input: &str) -> Result<f64, BoardError> {
    let normalized = input.trim().replace(',', ".");
    if normalized.is_empty() {
        return Err(BoardError::InvalidMetricValue {
            metric: metric.to_string(),
            field,
            input: input.to_string(),
        });
    }
    normalized.parse::<f64>().map_err(|_| BoardError::InvalidMetricValue {
        metric: metric.to_string(),
        field,
        input: input.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_up_boundaries_are_inclusive() {
        // Exactly on target is Ok, exactly on warning is Warning
        assert_eq!(classify(900.0, 900.0, 820.0, Direction::Up), Status::Ok);
        assert_eq!(classify(820.0, 900.0, 820.0, Direction::Up), Status::Warning);
        assert_eq!(classify(819.9, 900.0, 820.0, Direction::Up), Status::Critical);
    }

    #[test]
    fn test_down_boundaries_are_inclusive() {
        // Drop-out %: target 10, warning 15, lower is better
        assert_eq!(classify(10.0, 10.0, 15.0, Direction::Down), Status::Ok);
        assert_eq!(classify(15.0, 10.0, 15.0, Direction::Down), Status::Warning);
        assert_eq!(classify(15.1, 10.0, 15.0, Direction::Down), Status::Critical);
    }

    #[test]
    fn test_player_count_example() {
        // Pelaajamäärä: target 900, warning 820
        assert_eq!(classify(850.0, 900.0, 820.0, Direction::Up), Status::Warning);
        assert_eq!(classify(920.0, 900.0, 820.0, Direction::Up), Status::Ok);
        assert_eq!(classify(800.0, 900.0, 820.0, Direction::Up), Status::Critical);
    }

    #[test]
    fn test_monotonic_in_value_for_up() {
        // With target >= warning, raising the value never worsens the status
        let target = 100.0;
        let warning = 60.0;
        let mut prev = classify(-50.0, target, warning, Direction::Up);
        let mut v = -50.0;
        while v <= 150.0 {
            let status = classify(v, target, warning, Direction::Up);
            assert!(status <= prev, "status worsened at value {}", v);
            prev = status;
            v += 2.5;
        }
    }

    #[test]
    fn test_up_down_mirror_symmetry() {
        let cases = [
            (850.0, 900.0, 820.0),
            (920.0, 900.0, 820.0),
            (800.0, 900.0, 820.0),
            (0.0, 0.0, -20000.0),
        ];
        for (v, t, w) in cases {
            assert_eq!(
                classify(v, t, w, Direction::Up),
                classify(-v, -t, -w, Direction::Down),
                "mirror mismatch for ({}, {}, {})",
                v,
                t,
                w
            );
        }
    }

    #[test]
    fn test_parse_field_accepts_decimal_comma() {
        assert_eq!(parse_field("Pelaajatyytyväisyys", "value", "4,2").unwrap(), 4.2);
        assert_eq!(parse_field("Pelaajatyytyväisyys", "value", " 4.2 ").unwrap(), 4.2);
        assert_eq!(parse_field("Tulosennuste", "target", "-20000").unwrap(), -20000.0);
    }

    #[test]
    fn test_parse_field_rejects_non_numeric() {
        let err = parse_field("Pelaajamäärä yht.", "value", "paljon").unwrap_err();
        match err {
            BoardError::InvalidMetricValue { metric, field, input } => {
                assert_eq!(metric, "Pelaajamäärä yht.");
                assert_eq!(field, "value");
                assert_eq!(input, "paljon");
            }
            other => panic!("unexpected error: {}", other),
        }

        assert!(parse_field("X", "warning", "").is_err());
        assert!(parse_field("X", "warning", "  ").is_err());
    }

    #[test]
    fn test_direction_serde_wire_format() {
        assert_eq!(serde_json::to_string(&Direction::Up).unwrap(), "\"up\"");
        assert_eq!(serde_json::to_string(&Direction::Down).unwrap(), "\"down\"");
        let d: Direction = serde_json::from_str("\"down\"").unwrap();
        assert_eq!(d, Direction::Down);
    }

    #[test]
    fn test_display_status_from_classification() {
        assert_eq!(DisplayStatus::from(Status::Warning), DisplayStatus::Warning);
        assert_ne!(DisplayStatus::NoData, DisplayStatus::Critical);
    }
}
