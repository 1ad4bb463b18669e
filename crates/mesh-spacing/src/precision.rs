//! Fixed-decimal rounding applied to every length, rate and fraction.
//!
//! The geometric search compares series totals against 1 after every
//! iteration. Rounding each intermediate value to a fixed number of decimals
//! keeps those comparisons reproducible and guarantees the relax loop moves
//! on a finite grid.

use serde::{Deserialize, Serialize};

use crate::error::SpacingError;

/// Number of decimals used when no precision is configured.
pub const DEFAULT_DECIMALS: u32 = 6;

/// Largest supported precision. Beyond this the relax step falls below the
/// resolution of `f64` for rates near 1.
pub const MAX_DECIMALS: u32 = 12;

/// Decimal rounding policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Precision {
    decimals: u32,
}

impl Precision {
    pub fn new(decimals: u32) -> Result<Self, SpacingError> {
        if decimals > MAX_DECIMALS {
            return Err(SpacingError::PrecisionTooHigh {
                decimals,
                max: MAX_DECIMALS,
            });
        }
        Ok(Self { decimals })
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    /// Round half away from zero to the configured number of decimals.
    pub fn round(&self, value: f64) -> f64 {
        let scale = self.scale();
        (value * scale).round() / scale
    }

    /// Smallest representable increment, `10^-decimals`.
    pub fn step(&self) -> f64 {
        1.0 / self.scale()
    }

    fn scale(&self) -> f64 {
        10f64.powi(self.decimals as i32)
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self {
            decimals: DEFAULT_DECIMALS,
        }
    }
}

impl TryFrom<u32> for Precision {
    type Error = SpacingError;

    fn try_from(decimals: u32) -> Result<Self, Self::Error> {
        Self::new(decimals)
    }
}

impl From<Precision> for u32 {
    fn from(precision: Precision) -> Self {
        precision.decimals
    }
}
