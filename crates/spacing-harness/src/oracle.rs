//! Verification oracles: pure functions returning pass/fail verdicts.
//!
//! Each oracle returns an `OracleVerdict` with diagnostic detail instead of
//! panicking, so a test can collect every failure in one pass.

use mesh_spacing::{rate_for, series_sum, MeshDistribution, Precision};

use crate::bottom_up::bottom_up;

/// Relative slack on size bounds.
const SIZE_TOLERANCE: f64 = 1e-9;

/// The result of a single oracle check.
#[derive(Debug, Clone)]
pub struct OracleVerdict {
    pub oracle_name: String,
    pub passed: bool,
    pub detail: String,
    pub value: Option<f64>,
}

impl OracleVerdict {
    fn pass(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: None,
        }
    }

    fn pass_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: Some(value),
        }
    }

    fn fail(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: None,
        }
    }

    fn fail_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: Some(value),
        }
    }
}

/// Geometric parameters, or `None` for a uniform distribution.
fn geometric_parts(d: &MeshDistribution) -> Option<(usize, f64, f64, f64)> {
    match d {
        MeshDistribution::Geometric {
            node_count,
            hrel_min,
            hrel_max,
            rate,
            ..
        } => Some((*node_count, *hrel_min, *hrel_max, *rate)),
        MeshDistribution::Uniform { .. } => None,
    }
}

// ── Geometric Oracles ───────────────────────────────────────────────────────

/// The series of a geometric distribution fits into the interval.
pub fn check_series_fits(d: &MeshDistribution, precision: Precision) -> OracleVerdict {
    let Some((nodes, hrel_min, _, rate)) = geometric_parts(d) else {
        return OracleVerdict::pass("series_fits", "uniform cells tile exactly".to_string());
    };
    let total = series_sum(hrel_min, nodes, rate, precision);
    if total <= 1.0 {
        OracleVerdict::pass_val(
            "series_fits",
            format!("{} cells at rate {} sum to {}", nodes - 1, rate, total),
            total,
        )
    } else {
        OracleVerdict::fail_val(
            "series_fits",
            format!("{} cells at rate {} sum to {} (> 1)", nodes - 1, rate, total),
            total,
        )
    }
}

/// One node more would not fit at its exact-fit rate.
pub fn check_node_maximality(d: &MeshDistribution, precision: Precision) -> OracleVerdict {
    let Some((nodes, hrel_min, hrel_max, _)) = geometric_parts(d) else {
        return OracleVerdict::pass("node_maximality", "uniform".to_string());
    };
    let next = nodes + 1;
    let rate = rate_for(hrel_min, hrel_max, next, precision);
    if rate <= 1.0 {
        return OracleVerdict::pass(
            "node_maximality",
            format!("no growth left at {} nodes", next),
        );
    }
    let total = series_sum(hrel_min, next, rate, precision);
    if total > 1.0 {
        OracleVerdict::pass_val(
            "node_maximality",
            format!("{} nodes at rate {} sum to {}", next, rate, total),
            total,
        )
    } else {
        OracleVerdict::fail_val(
            "node_maximality",
            format!("{} nodes at rate {} still fit (sum {})", next, rate, total),
            total,
        )
    }
}

/// The rate lies in `[1, hrel_max / hrel_min]`.
pub fn check_rate_bound(d: &MeshDistribution) -> OracleVerdict {
    let Some((_, hrel_min, hrel_max, rate)) = geometric_parts(d) else {
        return OracleVerdict::pass("rate_bound", "uniform".to_string());
    };
    let upper = hrel_max / hrel_min;
    if (1.0..=upper).contains(&rate) {
        OracleVerdict::pass_val("rate_bound", format!("1 <= {} <= {}", rate, upper), rate)
    } else {
        OracleVerdict::fail_val(
            "rate_bound",
            format!("rate {} outside [1, {}]", rate, upper),
            rate,
        )
    }
}

/// The largest cell does not exceed its target.
pub fn check_last_cell_bound(d: &MeshDistribution) -> OracleVerdict {
    let Some((_, _, hrel_max, _)) = geometric_parts(d) else {
        return OracleVerdict::pass("last_cell_bound", "uniform".to_string());
    };
    let achieved = d.achieved_max_rel();
    if achieved <= hrel_max * (1.0 + SIZE_TOLERANCE) {
        OracleVerdict::pass_val(
            "last_cell_bound",
            format!("last cell {} <= {}", achieved, hrel_max),
            achieved,
        )
    } else {
        OracleVerdict::fail_val(
            "last_cell_bound",
            format!("last cell {} exceeds {}", achieved, hrel_max),
            achieved,
        )
    }
}

/// Node counts from the solver and the bottom-up search differ by at most
/// one.
pub fn check_bottom_up_agreement(d: &MeshDistribution, precision: Precision) -> OracleVerdict {
    let Some((nodes, hrel_min, hrel_max, _)) = geometric_parts(d) else {
        return OracleVerdict::pass("bottom_up_agreement", "uniform".to_string());
    };
    let Some(fit) = bottom_up(hrel_min, hrel_max, precision) else {
        return OracleVerdict::fail(
            "bottom_up_agreement",
            format!("bottom-up search found no fit for [{}, {}]", hrel_min, hrel_max),
        );
    };
    let diff = nodes.abs_diff(fit.node_count);
    if diff <= 1 {
        OracleVerdict::pass_val(
            "bottom_up_agreement",
            format!("solver {} nodes, bottom-up {} nodes", nodes, fit.node_count),
            diff as f64,
        )
    } else {
        OracleVerdict::fail_val(
            "bottom_up_agreement",
            format!(
                "solver {} nodes, bottom-up {} nodes (differ by {})",
                nodes, fit.node_count, diff
            ),
            diff as f64,
        )
    }
}

// ── Uniform Oracles ─────────────────────────────────────────────────────────

/// Uniform cells tile `length`, none exceeds the requested size, and one
/// cell fewer would. The size bound is checked without slack.
pub fn check_uniform_spacing(d: &MeshDistribution, length: f64) -> OracleVerdict {
    let MeshDistribution::Uniform { lmax, .. } = d else {
        return OracleVerdict::fail("uniform_spacing", format!("{} distribution", d.kind()));
    };
    let cells = d.cell_sizes(length);
    let total: f64 = cells.iter().sum();
    let size = cells.first().copied().unwrap_or(length);

    if (total - length).abs() > length * SIZE_TOLERANCE {
        return OracleVerdict::fail_val(
            "uniform_spacing",
            format!("cells sum to {} on length {}", total, length),
            total,
        );
    }
    if size > *lmax {
        return OracleVerdict::fail_val(
            "uniform_spacing",
            format!("cell size {} exceeds {}", size, lmax),
            size,
        );
    }
    if cells.len() > 1 {
        let coarser = length / (cells.len() - 1) as f64;
        if coarser <= lmax * (1.0 - SIZE_TOLERANCE) {
            return OracleVerdict::fail_val(
                "uniform_spacing",
                format!("{} cells would also stay within {}", cells.len() - 1, lmax),
                coarser,
            );
        }
    }
    OracleVerdict::pass_val(
        "uniform_spacing",
        format!("{} cells of {} <= {}", cells.len(), size, lmax),
        size,
    )
}

// ── Anchor Oracles ──────────────────────────────────────────────────────────

/// Two distributions of the same bounds with opposite anchors mirror each
/// other.
pub fn check_symmetry(a: &MeshDistribution, b: &MeshDistribution) -> OracleVerdict {
    let mirrored = a.node_count() == b.node_count()
        && a.rate() == b.rate()
        && a.h1rel() == b.h2rel()
        && a.h2rel() == b.h1rel()
        && a.r1() == b.r2()
        && a.r2() == b.r1();
    if mirrored {
        OracleVerdict::pass(
            "symmetry",
            format!("{} and {} mirror at {} nodes", a.kind(), b.kind(), a.node_count()),
        )
    } else {
        OracleVerdict::fail("symmetry", format!("{:?} does not mirror {:?}", a, b))
    }
}

/// Every geometric oracle that applies to `d`, plus the uniform check when
/// `d` is uniform.
pub fn run_all(d: &MeshDistribution, length: f64, precision: Precision) -> Vec<OracleVerdict> {
    match d {
        MeshDistribution::Uniform { .. } => vec![check_uniform_spacing(d, length)],
        MeshDistribution::Geometric { .. } => vec![
            check_series_fits(d, precision),
            check_node_maximality(d, precision),
            check_rate_bound(d),
            check_last_cell_bound(d),
            check_bottom_up_agreement(d, precision),
        ],
    }
}
