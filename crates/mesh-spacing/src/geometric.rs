//! Geometric (bi-sized) node distribution.
//!
//! The search maximizes node count first and then relaxes the growth rate
//! so the series fits:
//!
//! 1. Seed with the node count a uniform mesh of size `hrel_min` would need.
//! 2. Walk the node count down until the exact-fit series (first cell
//!    `hrel_min`, last cell `hrel_max`) fits into the interval.
//! 3. Take one node more than that and lower the rate in steps of `10^-P`
//!    until the series fits again. The last cell then ends up just below
//!    `hrel_max`.
//!
//! If step 3 would need a rate below 1 the extra node is dropped and the
//! strictly feasible count is returned with its exact-fit rate.

use tracing::{debug, instrument};

use crate::config::SpacingConfig;
use crate::distribution::{Anchor, MeshDistribution};
use crate::error::{ensure_positive, Infeasibility, SpacingError};
use crate::precision::Precision;

/// Smallest node count for which an exact-fit rate is defined (two cells).
pub const MIN_GEOMETRIC_NODES: usize = 3;

/// Total relative length of `nodes - 1` cells with first cell `hrel` and
/// common ratio `rate`, rounded to `precision`.
pub fn series_sum(hrel: f64, nodes: usize, rate: f64, precision: Precision) -> f64 {
    let cells = nodes.saturating_sub(1) as f64;
    let sum = if rate == 1.0 {
        hrel * cells
    } else {
        hrel * (1.0 - rate.powf(cells)) / (1.0 - rate)
    };
    precision.round(sum)
}

/// Ratio at which the last of `nodes - 1` cells equals `hrel_max` exactly,
/// rounded to `precision`. Requires `nodes >= 3`.
pub fn rate_for(hrel_min: f64, hrel_max: f64, nodes: usize, precision: Precision) -> f64 {
    debug_assert!(nodes >= MIN_GEOMETRIC_NODES);
    let exponent = 1.0 / (nodes - 2) as f64;
    precision.round((hrel_max / hrel_min).powf(exponent))
}

/// Result of the node-count/rate search on relative sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometricFit {
    pub node_count: usize,
    pub rate: f64,
    /// Largest node count whose exact-fit series stays within the interval.
    pub strict_node_count: usize,
    /// Number of `10^-P` decrements applied to the rate.
    pub relax_steps: usize,
}

/// Geometric distribution between `min_cell_size` at the anchor end and at
/// most `max_cell_size` at the other end.
///
/// Fails with [`SpacingError::Infeasible`] when the bounds cannot be fitted;
/// it never substitutes another rule on its own.
#[instrument(level = "debug", skip(config))]
pub fn solve_geometric(
    length: f64,
    min_cell_size: f64,
    max_cell_size: f64,
    anchor: Anchor,
    config: &SpacingConfig,
) -> Result<MeshDistribution, SpacingError> {
    ensure_positive("length", length)?;
    ensure_positive("minimum cell size", min_cell_size)?;
    ensure_positive("maximum cell size", max_cell_size)?;

    if min_cell_size >= max_cell_size {
        return Err(Infeasibility::MinNotBelowMax {
            hmin: min_cell_size,
            hmax: max_cell_size,
        }
        .into());
    }
    if min_cell_size + max_cell_size > length {
        return Err(Infeasibility::ExceedsLength {
            hmin: min_cell_size,
            hmax: max_cell_size,
            length,
        }
        .into());
    }

    let precision = config.precision;
    let hrel_min = precision.round(min_cell_size / length);
    let hrel_max = precision.round(max_cell_size / length);
    if hrel_min <= 0.0 {
        return Err(Infeasibility::BelowPrecision {
            size: min_cell_size,
            length,
            decimals: precision.decimals(),
        }
        .into());
    }

    let fit = fit_relative(hrel_min, hrel_max, config)?;
    Ok(MeshDistribution::Geometric {
        anchor,
        node_count: fit.node_count,
        hrel_min,
        hrel_max,
        rate: fit.rate,
        lmax: max_cell_size,
    })
}

/// Node count and rate for relative bounds `0 < hrel_min <= hrel_max`.
pub fn fit_relative(
    hrel_min: f64,
    hrel_max: f64,
    config: &SpacingConfig,
) -> Result<GeometricFit, SpacingError> {
    ensure_positive("relative minimum cell size", hrel_min)?;
    ensure_positive("relative maximum cell size", hrel_max)?;
    if hrel_min > hrel_max {
        return Err(Infeasibility::MinNotBelowMax {
            hmin: hrel_min,
            hmax: hrel_max,
        }
        .into());
    }
    let precision = config.precision;

    // Checked as a float so a tiny `hrel_min` cannot overflow the cast.
    let seed_cells = precision.round(1.0 / hrel_min).ceil();
    if seed_cells + 1.0 > config.max_seed_nodes as f64 {
        return Err(Infeasibility::SeedTooLarge {
            seed: (seed_cells as usize).saturating_add(1),
            limit: config.max_seed_nodes,
        }
        .into());
    }
    let seed = seed_cells as usize + 1;

    let mut nodes = seed.max(MIN_GEOMETRIC_NODES);
    let mut total = series_sum(hrel_min, nodes, rate_for(hrel_min, hrel_max, nodes, precision), precision);
    while total > 1.0 && nodes > MIN_GEOMETRIC_NODES {
        nodes -= 1;
        let rate = rate_for(hrel_min, hrel_max, nodes, precision);
        total = series_sum(hrel_min, nodes, rate, precision);
    }
    if total > 1.0 {
        return Err(Infeasibility::RoundingStall {
            decimals: precision.decimals(),
        }
        .into());
    }
    let strict = nodes;

    let fit = match relax(hrel_min, hrel_max, strict + 1, config)? {
        Some((rate, steps)) => GeometricFit {
            node_count: strict + 1,
            rate,
            strict_node_count: strict,
            relax_steps: steps,
        },
        None => match relax(hrel_min, hrel_max, strict, config)? {
            Some((rate, steps)) => GeometricFit {
                node_count: strict,
                rate,
                strict_node_count: strict,
                relax_steps: steps,
            },
            None => {
                return Err(Infeasibility::RoundingStall {
                    decimals: precision.decimals(),
                }
                .into());
            }
        },
    };

    debug!(
        seed,
        strict,
        nodes = fit.node_count,
        rate = fit.rate,
        steps = fit.relax_steps,
        "geometric fit"
    );
    Ok(fit)
}

/// Lower the exact-fit rate at `nodes` until the series fits and the last
/// cell does not exceed `hrel_max`. `None` if that needs a rate below 1.
fn relax(
    hrel_min: f64,
    hrel_max: f64,
    nodes: usize,
    config: &SpacingConfig,
) -> Result<Option<(f64, usize)>, SpacingError> {
    let precision = config.precision;
    let step = precision.step();

    let mut rate = rate_for(hrel_min, hrel_max, nodes, precision);
    let mut total = series_sum(hrel_min, nodes, rate, precision);
    let mut steps = 0;

    while total > 1.0 || last_cell_exceeds(hrel_min, hrel_max, nodes, rate) {
        if steps >= config.max_relax_steps {
            return Err(SpacingError::NonConvergent {
                iterations: steps,
                total,
            });
        }
        let next = precision.round(rate - step);
        if next < 1.0 {
            return Ok(None);
        }
        rate = next;
        total = series_sum(hrel_min, nodes, rate, precision);
        steps += 1;
    }

    Ok(Some((precision.round(rate), steps)))
}

/// Relative slack on the last-cell bound, absorbing `powi` round-off.
const LAST_CELL_TOLERANCE: f64 = 1e-12;

// Compared unrounded: at small relative sizes P decimals carry too few
// significant digits to bound the last cell.
fn last_cell_exceeds(hrel_min: f64, hrel_max: f64, nodes: usize, rate: f64) -> bool {
    hrel_min * rate.powi(nodes as i32 - 2) > hrel_max * (1.0 + LAST_CELL_TOLERANCE)
}
