//! Board assembly: catalog + snapshot store -> display-ready state.
//!
//! Rebuilt from scratch on every reload so the risk lists always match the
//! cards on screen.

use std::time::Instant;

use crate::catalog::Catalog;
use crate::data::status::{classify, DisplayStatus, Status};
use crate::store::{Snapshot, SnapshotStore};

/// One metric card ready for rendering.
#[derive(Debug, Clone)]
pub struct MetricCard {
    pub name: String,
    pub status: DisplayStatus,
    /// The snapshot with the greatest timestamp, if any exists.
    pub latest: Option<Snapshot>,
    /// Full value series, ascending by timestamp.
    pub series: Vec<Snapshot>,
}

impl MetricCard {
    /// Points for the trend line, or `None` when there is nothing to plot.
    ///
    /// A single observation is not a trend; the card shows a caption
    /// instead of a one-point chart.
    pub fn trend_points(&self) -> Option<Vec<(f64, f64)>> {
        if self.series.len() < 2 {
            return None;
        }
        Some(self.series.iter().map(|s| (s.date.timestamp() as f64, s.value)).collect())
    }

    /// The series values alone, for sparkline rendering.
    pub fn trend_values(&self) -> Option<Vec<f64>> {
        if self.series.len() < 2 {
            return None;
        }
        Some(self.series.iter().map(|s| s.value).collect())
    }
}

/// A category section of the board.
#[derive(Debug, Clone)]
pub struct CategoryCards {
    pub name: String,
    pub cards: Vec<MetricCard>,
}

/// Names of metrics currently in the warning and critical bands.
///
/// Populated from the classified latest snapshots during
/// [`BoardData::build`]; never carried over between builds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RiskSummary {
    pub critical: Vec<String>,
    pub warning: Vec<String>,
}

/// Complete board state for one render pass.
#[derive(Debug, Clone)]
pub struct BoardData {
    pub categories: Vec<CategoryCards>,
    pub risks: RiskSummary,
    pub last_updated: Instant,
}

impl BoardData {
    /// Assemble the board from the catalog and the store.
    ///
    /// Every catalog metric gets a card; metrics without snapshots render
    /// as [`DisplayStatus::NoData`] rather than being classified.
    pub fn build(catalog: &Catalog, store: &SnapshotStore) -> Self {
        let latest = store.latest_per_metric();
        let mut risks = RiskSummary::default();

        let categories = catalog
            .categories
            .iter()
            .map(|category| {
                let cards = category
                    .metrics
                    .iter()
                    .map(|def| {
                        let latest_snap = latest.get(&def.name).cloned();
                        let status = match &latest_snap {
                            Some(s) => {
                                let status = classify(s.value, s.target, s.warning, s.direction);
                                match status {
                                    Status::Critical => risks.critical.push(def.name.clone()),
                                    Status::Warning => risks.warning.push(def.name.clone()),
                                    Status::Ok => {}
                                }
                                DisplayStatus::from(status)
                            }
                            None => DisplayStatus::NoData,
                        };
                        MetricCard {
                            name: def.name.clone(),
                            status,
                            latest: latest_snap,
                            series: store.series_for(&def.name),
                        }
                    })
                    .collect();
                CategoryCards {
                    name: category.name.clone(),
                    cards,
                }
            })
            .collect();

        Self {
            categories,
            risks,
            last_updated: Instant::now(),
        }
    }

    /// Iterate every card across categories.
    pub fn cards(&self) -> impl Iterator<Item = &MetricCard> {
        self.categories.iter().flat_map(|c| c.cards.iter())
    }

    /// Counts of (ok, warning, critical, no-data) cards, for the header.
    pub fn status_counts(&self) -> (usize, usize, usize, usize) {
        let mut ok = 0;
        let mut warning = 0;
        let mut critical = 0;
        let mut no_data = 0;
        for card in self.cards() {
            match card.status {
                DisplayStatus::Ok => ok += 1,
                DisplayStatus::Warning => warning += 1,
                DisplayStatus::Critical => critical += 1,
                DisplayStatus::NoData => no_data += 1,
            }
        }
        (ok, warning, critical, no_data)
    }
}
