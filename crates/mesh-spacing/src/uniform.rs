use tracing::{debug, instrument};

use crate::config::SpacingConfig;
use crate::distribution::MeshDistribution;
use crate::error::{ensure_positive, Infeasibility, SpacingError};

/// Constant cell size no larger than `max_cell_size`.
///
/// `node_count = ceil(length / h) + 1`. Only a last-bit error of the quotient
/// is absorbed; the resulting cell `length / (node_count - 1)` never exceeds
/// `h`. A cell size larger than the interval is accepted and yields the
/// minimal two-node distribution.
#[instrument(level = "debug", skip(config))]
pub fn solve_uniform(
    length: f64,
    max_cell_size: f64,
    config: &SpacingConfig,
) -> Result<MeshDistribution, SpacingError> {
    ensure_positive("length", length)?;
    ensure_positive("maximum cell size", max_cell_size)?;
    let precision = config.precision;

    let cell_rel = precision.round(max_cell_size / length).min(1.0);
    if cell_rel <= 0.0 {
        return Err(Infeasibility::BelowPrecision {
            size: max_cell_size,
            length,
            decimals: precision.decimals(),
        }
        .into());
    }

    let cells = cell_count(length, max_cell_size);
    debug!(cells, cell_rel, "uniform distribution");

    Ok(MeshDistribution::Uniform {
        node_count: cells + 1,
        cell_rel,
        lmax: max_cell_size,
    })
}

/// Fewest cells of size at most `max_cell_size` covering `length`.
fn cell_count(length: f64, max_cell_size: f64) -> usize {
    let quotient = length / max_cell_size;
    let mut cells = (quotient - quotient * f64::EPSILON).ceil().max(1.0) as usize;
    while length / cells as f64 > max_cell_size {
        cells += 1;
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_multiple() {
        let d = solve_uniform(1.0, 0.1, &SpacingConfig::default()).unwrap();
        assert_eq!(d.node_count(), 11);
        assert_relative_eq!(1.0 / d.cell_count() as f64, 0.1);
        assert_eq!(d.h1rel(), 0.1);
        assert_eq!(d.h2rel(), 0.1);
        assert_eq!(d.lmax(), 0.1);
    }

    #[test]
    fn test_rounds_cell_count_up() {
        let d = solve_uniform(1.0, 0.3, &SpacingConfig::default()).unwrap();
        assert_eq!(d.node_count(), 5);
        assert!(1.0 / d.cell_count() as f64 <= 0.3);
    }

    #[test]
    fn test_quotient_just_above_integer_adds_a_cell() {
        let config = SpacingConfig::default();
        let d = solve_uniform(1.000_000_04, 0.1, &config).unwrap();
        assert_eq!(d.node_count(), 12);
        assert!(1.000_000_04 / d.cell_count() as f64 <= 0.1);

        let length = 0.1 + 0.2;
        let d = solve_uniform(length, 0.1, &config).unwrap();
        assert_eq!(d.node_count(), 5);
        assert!(length / d.cell_count() as f64 <= 0.1);
    }

    #[test]
    fn test_exact_multiple_with_inexact_ratio() {
        let d = solve_uniform(3.0, 0.1, &SpacingConfig::default()).unwrap();
        assert_eq!(d.node_count(), 31);
        assert_eq!(d.h1rel(), 0.033333);
    }

    #[test]
    fn test_cell_larger_than_length_gives_two_nodes() {
        let d = solve_uniform(0.5, 2.0, &SpacingConfig::default()).unwrap();
        assert_eq!(d.node_count(), 2);
        assert_eq!(d.h1rel(), 1.0);
    }

    #[test]
    fn test_rejects_non_positive_inputs() {
        let config = SpacingConfig::default();
        assert!(matches!(
            solve_uniform(0.0, 0.1, &config),
            Err(SpacingError::InvalidInput { what: "length", .. })
        ));
        assert!(matches!(
            solve_uniform(1.0, -0.1, &config),
            Err(SpacingError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_cell_below_precision() {
        assert!(matches!(
            solve_uniform(1.0, 1e-8, &SpacingConfig::default()),
            Err(SpacingError::Infeasible(Infeasibility::BelowPrecision { .. }))
        ));
    }
}
