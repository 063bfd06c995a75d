//! The fixed metric catalog.
//!
//! The board decides the set of KPIs; the catalog is supplied as static
//! configuration and is immutable at runtime. A built-in catalog mirrors
//! the board's current scorecard; an alternative can be loaded from a
//! TOML/JSON/YAML file.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::status::Direction;

/// One KPI the board tracks.
///
/// `default_value` seeds the entry form when no snapshot exists yet;
/// `target` and `warning` are the classification thresholds the form is
/// prefilled with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricDefinition {
    /// Unique within its category (and, on this board, globally).
    pub name: String,
    pub default_value: f64,
    pub target: f64,
    pub warning: f64,
    pub direction: Direction,
}

/// A named group of metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub metrics: Vec<MetricDefinition>,
}

/// Immutable catalog of every metric on the board, grouped by category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<Category>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::board_defaults()
    }
}

fn metric(
    name: &str,
    default_value: f64,
    target: f64,
    warning: f64,
    direction: Direction,
) -> MetricDefinition {
    MetricDefinition {
        name: name.to_string(),
        default_value,
        target,
        warning,
        direction,
    }
}

impl Catalog {
    /// The scorecard the board currently uses: four categories, sixteen
    /// metrics, with the targets and warning limits decided by the board.
    pub fn board_defaults() -> Self {
        use Direction::{Down, Up};

        Self {
            categories: vec![
                Category {
                    name: "ELINVOIMA".to_string(),
                    metrics: vec![
                        metric("Pelaajamäärä yht.", 850.0, 900.0, 820.0, Up),
                        metric("Nettokasvu (uudet–lopettaneet)", 25.0, 30.0, 10.0, Up),
                        metric("Lopettamis-% 13–15v", 12.0, 10.0, 15.0, Down),
                        metric("Tyttö-/naispelaajamäärä", 220.0, 250.0, 200.0, Up),
                    ],
                },
                Category {
                    name: "TALOUS".to_string(),
                    metrics: vec![
                        metric("Kassatilanne + ennuste", 150_000.0, 100_000.0, 60_000.0, Up),
                        metric("Tulosennuste", 12_000.0, 0.0, -20_000.0, Up),
                        metric("Kattavuus % (maksut/kulut)", 102.0, 100.0, 95.0, Up),
                        metric("Muut tuotot", 35_000.0, 30_000.0, 20_000.0, Up),
                    ],
                },
                Category {
                    name: "VALMENNUS".to_string(),
                    metrics: vec![
                        metric("Valmentajien pysyvyys", 85.0, 90.0, 75.0, Up),
                        metric("Koulutetut %", 72.0, 80.0, 60.0, Up),
                        metric("Valmentajamäärä/joukkue", 2.1, 2.0, 1.5, Up),
                    ],
                },
                Category {
                    name: "LAATU".to_string(),
                    metrics: vec![
                        metric("Pelaajatyytyväisyys", 4.2, 4.3, 4.0, Up),
                        metric("Vanhempien tyytyväisyys", 4.0, 4.2, 3.9, Up),
                        metric("Valmentajien/taustojen tyytyväisyys", 4.3, 4.4, 4.0, Up),
                        metric("Huipputasolle nousseet/vuosi", 3.0, 3.0, 1.0, Up),
                        metric("Valmennuslinjan toteutuminen", 78.0, 85.0, 70.0, Up),
                    ],
                },
            ],
        }
    }

    /// Load a catalog from a config file (TOML, JSON or YAML by extension).
    pub fn load(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .build()
            .with_context(|| format!("cannot read catalog {}", path.display()))?;

        let catalog: Catalog = settings
            .try_deserialize()
            .with_context(|| format!("catalog {} has unexpected shape", path.display()))?;

        if catalog.categories.iter().all(|c| c.metrics.is_empty()) {
            bail!("catalog {} defines no metrics", path.display());
        }
        Ok(catalog)
    }

    /// Iterate every metric with its category name.
    pub fn metrics(&self) -> impl Iterator<Item = (&str, &MetricDefinition)> {
        self.categories
            .iter()
            .flat_map(|c| c.metrics.iter().map(move |m| (c.name.as_str(), m)))
    }

    /// Total number of metrics across categories.
    pub fn metric_count(&self) -> usize {
        self.categories.iter().map(|c| c.metrics.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_board_defaults_shape() {
        let catalog = Catalog::board_defaults();
        assert_eq!(catalog.categories.len(), 4);
        assert_eq!(catalog.metric_count(), 16);

        // Names are unique across the whole board
        let mut names: Vec<&str> = catalog.metrics().map(|(_, m)| m.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 16);
    }

    #[test]
    fn test_default_values_are_sane() {
        // The drop-out metric is the only decreasing-is-better one, and its
        // warning limit sits above the target
        let catalog = Catalog::board_defaults();
        let (_, dropout) = catalog
            .metrics()
            .find(|(_, m)| m.name.starts_with("Lopettamis"))
            .unwrap();
        assert_eq!(dropout.direction, Direction::Down);
        assert!(dropout.warning > dropout.target);

        // Every increasing metric has warning below target
        for (_, m) in catalog.metrics().filter(|(_, m)| m.direction == Direction::Up) {
            assert!(m.warning < m.target, "{} has warning >= target", m.name);
        }
    }

    #[test]
    fn test_load_json_catalog() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{
                "categories": [
                    {{
                        "name": "TEST",
                        "metrics": [
                            {{
                                "name": "Jäsenmäärä",
                                "default_value": 100.0,
                                "target": 120.0,
                                "warning": 90.0,
                                "direction": "up"
                            }}
                        ]
                    }}
                ]
            }}"#
        )
        .unwrap();
        file.flush().unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.metric_count(), 1);
        assert_eq!(catalog.categories[0].metrics[0].name, "Jäsenmäärä");
    }

    #[test]
    fn test_load_rejects_empty_catalog() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"categories": []}}"#).unwrap();
        file.flush().unwrap();

        // All-empty catalogs are refused; categories: [] trivially has no metrics
        assert!(Catalog::load(file.path()).is_err());
    }
}
