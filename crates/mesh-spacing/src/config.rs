//! Solver configuration.

use serde::{Deserialize, Serialize};

use crate::precision::Precision;

/// Limits and rounding policy shared by all solvers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacingConfig {
    /// Decimal precision applied to relative sizes, rates and series totals.
    pub precision: Precision,
    /// Upper bound on the seed node count of the geometric search.
    /// Guards against minimum sizes so small that the search becomes impractical.
    pub max_seed_nodes: usize,
    /// Upper bound on the number of `10^-P` decrements in the rate relax loop.
    pub max_relax_steps: usize,
}

impl Default for SpacingConfig {
    fn default() -> Self {
        Self {
            precision: Precision::default(),
            max_seed_nodes: 10_000_000,
            max_relax_steps: 10_000_000,
        }
    }
}

impl SpacingConfig {
    /// Four decimals. Fast, but rates near 1 collapse onto a coarse grid.
    pub fn coarse() -> Self {
        Self {
            precision: Precision::new(4).unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Eight decimals, for very fine boundary cells.
    pub fn fine() -> Self {
        Self {
            precision: Precision::new(8).unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn with_precision(precision: Precision) -> Self {
        Self {
            precision,
            ..Self::default()
        }
    }

    /// Parse a standalone JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("SpacingConfig serialization should never fail")
    }
}
