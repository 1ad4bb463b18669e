//! Bottom-up geometric search.
//!
//! Works from the other direction to the solver: the cells always fill the
//! interval exactly, and the question is how few of them can do so while the
//! first stays at or below `hrel_min` and the last at or below `hrel_max`.
//! For `c` cells at rate `r` the first cell is `(r - 1) / (r^c - 1)` and the
//! last `first * r^(c - 1)`.
//!
//! The search is linear in `1 / hrel_min`. It is meant for tests, not for
//! production sizing.

use mesh_spacing::Precision;
use tracing::trace;

/// Relative slack on both cell bounds, absorbing `powi` round-off.
const BOUND_TOLERANCE: f64 = 1e-9;

/// Smallest node count whose exactly-filling series respects both bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BottomUpFit {
    pub node_count: usize,
    pub rate: f64,
    pub first_rel: f64,
    pub last_rel: f64,
}

fn first_cell(rate: f64, cells: usize) -> f64 {
    if rate == 1.0 {
        1.0 / cells as f64
    } else {
        (rate - 1.0) / (rate.powi(cells as i32) - 1.0)
    }
}

fn last_cell(rate: f64, cells: usize) -> f64 {
    first_cell(rate, cells) * rate.powi(cells as i32 - 1)
}

/// Smallest rate on the `10^-P` grid whose first cell is at most `hrel_min`,
/// or `None` if not even `max_rate` gets there.
fn min_rate(hrel_min: f64, cells: usize, max_rate: f64, step: f64) -> Option<f64> {
    let fits = |k: u64| first_cell(1.0 + k as f64 * step, cells) <= hrel_min * (1.0 + BOUND_TOLERANCE);
    if fits(0) {
        return Some(1.0);
    }

    let max_k = ((max_rate - 1.0) / step).ceil() as u64;
    if max_k == 0 || !fits(max_k) {
        return None;
    }

    let (mut lo, mut hi) = (0u64, 1u64);
    while hi < max_k && !fits(hi) {
        lo = hi;
        hi = (hi * 2).min(max_k);
    }
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if fits(mid) {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    Some(1.0 + hi as f64 * step)
}

fn fit_at(hrel_min: f64, hrel_max: f64, cells: usize, step: f64) -> Option<BottomUpFit> {
    let rate = min_rate(hrel_min, cells, hrel_max / hrel_min, step)?;
    let last = last_cell(rate, cells);
    (last <= hrel_max * (1.0 + BOUND_TOLERANCE)).then(|| BottomUpFit {
        node_count: cells + 1,
        rate,
        first_rel: first_cell(rate, cells),
        last_rel: last,
    })
}

/// Search for the fewest nodes that fill the interval within the bounds.
///
/// Returns `None` unless `0 < hrel_min < hrel_max` and the two cells fit
/// side by side.
pub fn bottom_up(hrel_min: f64, hrel_max: f64, precision: Precision) -> Option<BottomUpFit> {
    if !(hrel_min > 0.0 && hrel_min < hrel_max && hrel_min + hrel_max <= 1.0) {
        return None;
    }
    let step = precision.step();

    let mut cells = (precision.round(1.0 / hrel_min).ceil() as usize).max(2);
    let mut best = fit_at(hrel_min, hrel_max, cells, step)?;
    while cells > 2 {
        match fit_at(hrel_min, hrel_max, cells - 1, step) {
            Some(fit) => {
                best = fit;
                cells -= 1;
            }
            None => break,
        }
    }

    trace!(nodes = best.node_count, rate = best.rate, "bottom-up fit");
    Some(best)
}
