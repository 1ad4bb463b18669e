use thiserror::Error;

/// Errors raised by the spacing solvers and the section model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpacingError {
    #[error("invalid input: {what} must be a positive finite number, got {value}")]
    InvalidInput { what: &'static str, value: f64 },

    #[error("infeasible cell-size bounds: {0}")]
    Infeasible(#[from] Infeasibility),

    #[error("growth-rate relaxation did not converge after {iterations} steps (series total: {total})")]
    NonConvergent { iterations: usize, total: f64 },

    #[error("section '{section}' already has a distribution")]
    AlreadyDistributed { section: String },

    #[error("section '{section}' has no distribution")]
    Undistributed { section: String },

    #[error("duplicate section name '{0}'")]
    DuplicateSection(String),

    #[error("unknown distribution kind '{0}'")]
    UnknownKind(String),

    #[error("malformed distribution record '{record}': {reason}")]
    MalformedRecord { record: String, reason: String },

    #[error("precision of {decimals} decimals exceeds the supported maximum of {max}")]
    PrecisionTooHigh { decimals: u32, max: u32 },
}

/// Why a pair of geometric cell-size bounds cannot be fitted to an interval.
///
/// Kept separate from [`SpacingError`] so that policy layers can match on
/// `SpacingError::Infeasible(_)` alone when deciding whether to fall back.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Infeasibility {
    #[error("minimum cell size {hmin} is not below maximum cell size {hmax}")]
    MinNotBelowMax { hmin: f64, hmax: f64 },

    #[error("minimum {hmin} plus maximum {hmax} cell size exceeds interval length {length}")]
    ExceedsLength { hmin: f64, hmax: f64, length: f64 },

    #[error("cell size {size} relative to length {length} rounds to zero at {decimals} decimals")]
    BelowPrecision { size: f64, length: f64, decimals: u32 },

    #[error("seed node count {seed} exceeds the limit of {limit}")]
    SeedTooLarge { seed: usize, limit: usize },

    #[error("series total cannot be brought to 1 at {decimals} decimals")]
    RoundingStall { decimals: u32 },
}

/// Reject non-positive, NaN or infinite values.
pub(crate) fn ensure_positive(what: &'static str, value: f64) -> Result<f64, SpacingError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SpacingError::InvalidInput { what, value })
    }
}
