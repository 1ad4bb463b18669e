//! Uniform fallback for infeasible geometric bounds.
//!
//! The solvers never substitute one rule for another. Callers that prefer a
//! usable mesh over an error go through this layer instead.

use tracing::warn;

use crate::config::SpacingConfig;
use crate::distribution::{Anchor, DistributionKind, MeshDistribution};
use crate::error::SpacingError;
use crate::export::ExportRecord;
use crate::geometric::solve_geometric;
use crate::uniform::solve_uniform;

#[derive(Debug, Clone, PartialEq)]
pub struct PolicyOutcome {
    pub distribution: MeshDistribution,
    /// Set when the geometric bounds were infeasible and a uniform
    /// distribution of the minimum size was substituted.
    pub fell_back: bool,
}

/// Geometric distribution, or uniform with `min_cell_size` if the bounds are
/// infeasible. Any other error is returned unchanged.
pub fn solve_or_uniform(
    length: f64,
    min_cell_size: f64,
    max_cell_size: f64,
    anchor: Anchor,
    config: &SpacingConfig,
) -> Result<PolicyOutcome, SpacingError> {
    match solve_geometric(length, min_cell_size, max_cell_size, anchor, config) {
        Ok(distribution) => Ok(PolicyOutcome {
            distribution,
            fell_back: false,
        }),
        Err(SpacingError::Infeasible(reason)) => {
            warn!(%reason, length, min_cell_size, "geometric bounds infeasible, using uniform");
            Ok(PolicyOutcome {
                distribution: solve_uniform(length, min_cell_size, config)?,
                fell_back: true,
            })
        }
        Err(err) => Err(err),
    }
}

/// [`MeshDistribution::reimport`], substituting a uniform distribution of the
/// scaled minimum size when a geometric record no longer fits `length`.
pub fn reimport_or_uniform(
    record: &ExportRecord,
    length: f64,
    scale_factor: f64,
    config: &SpacingConfig,
) -> Result<PolicyOutcome, SpacingError> {
    match MeshDistribution::reimport(record, length, scale_factor, config) {
        Ok(distribution) => Ok(PolicyOutcome {
            distribution,
            fell_back: false,
        }),
        Err(SpacingError::Infeasible(reason)) if record.kind != DistributionKind::Uniform => {
            let min_cell_size = scale_factor * record.h1rel.min(record.h2rel) * length;
            warn!(%reason, length, min_cell_size, "replayed bounds infeasible, using uniform");
            Ok(PolicyOutcome {
                distribution: solve_uniform(length, min_cell_size, config)?,
                fell_back: true,
            })
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_feasible_bounds_stay_geometric() {
        let outcome = solve_or_uniform(1.0, 0.01, 0.05, Anchor::MinAtStart, &SpacingConfig::default()).unwrap();
        assert!(!outcome.fell_back);
        assert_eq!(outcome.distribution.kind(), DistributionKind::Geometric1);
    }

    #[test]
    fn test_equal_bounds_fall_back_to_uniform() {
        let outcome = solve_or_uniform(1.0, 0.1, 0.1, Anchor::MinAtStart, &SpacingConfig::default()).unwrap();
        assert!(outcome.fell_back);
        let d = outcome.distribution;
        assert_eq!(d.kind(), DistributionKind::Uniform);
        assert_eq!(d.node_count(), 11);
        assert_relative_eq!(1.0 / d.cell_count() as f64, 0.1);
    }

    #[test]
    fn test_reimport_falls_back_when_coarsened_past_length() {
        let config = SpacingConfig::default();
        let d = solve_geometric(1.0, 0.1, 0.4, Anchor::MinAtStart, &config).unwrap();
        let record = d.export(config.precision);

        let same = reimport_or_uniform(&record, 1.0, 1.0, &config).unwrap();
        assert!(!same.fell_back);
        assert_eq!(same.distribution.node_count(), d.node_count());

        // 0.3 + 1.2 no longer fits into the unit interval.
        let coarse = reimport_or_uniform(&record, 1.0, 3.0, &config).unwrap();
        assert!(coarse.fell_back);
        assert_eq!(coarse.distribution.kind(), DistributionKind::Uniform);
        assert_eq!(coarse.distribution.node_count(), 5);
    }

    #[test]
    fn test_invalid_input_is_not_swallowed() {
        assert!(matches!(
            solve_or_uniform(1.0, -0.1, 0.05, Anchor::MinAtStart, &SpacingConfig::default()),
            Err(SpacingError::InvalidInput { .. })
        ));
    }
}
