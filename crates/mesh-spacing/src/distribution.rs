use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SpacingError;

/// Growth rate exported for both ends of a uniform distribution.
/// The consuming meshing tool ignores rates for its uniform rule; this is the
/// value its reference files carry.
pub const UNIFORM_RATE_SENTINEL: f64 = 2.0;

/// Growth rate exported for the non-anchored end of a geometric distribution.
pub const NO_GROWTH_RATE: f64 = 1.0;

/// Node distribution rule along an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistributionKind {
    #[serde(rename = "uniform")]
    Uniform,
    /// Cell size grows toward the coordinate-positive end.
    #[serde(rename = "geo1")]
    Geometric1,
    /// Cell size shrinks toward the coordinate-positive end.
    #[serde(rename = "geo2")]
    Geometric2,
}

impl DistributionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistributionKind::Uniform => "uniform",
            DistributionKind::Geometric1 => "geo1",
            DistributionKind::Geometric2 => "geo2",
        }
    }
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistributionKind {
    type Err = SpacingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "uniform" | "uni" => Ok(DistributionKind::Uniform),
            "geo1" => Ok(DistributionKind::Geometric1),
            "geo2" => Ok(DistributionKind::Geometric2),
            _ => Err(SpacingError::UnknownKind(s.to_string())),
        }
    }
}

/// End of the interval at which the minimum cell size is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    MinAtStart,
    MinAtEnd,
}

impl Anchor {
    pub fn kind(&self) -> DistributionKind {
        match self {
            Anchor::MinAtStart => DistributionKind::Geometric1,
            Anchor::MinAtEnd => DistributionKind::Geometric2,
        }
    }
}

/// A computed node distribution for one interval.
///
/// Relative sizes are fractions of the interval length. Once computed the
/// record is never mutated; recomputation yields a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum MeshDistribution {
    Uniform {
        node_count: usize,
        /// Requested cell size relative to the interval length.
        cell_rel: f64,
        /// Requested absolute cell size.
        lmax: f64,
    },
    Geometric {
        anchor: Anchor,
        node_count: usize,
        /// Relative size of the anchored (smallest) cell.
        hrel_min: f64,
        /// Target relative size of the largest cell. The achieved size is
        /// `hrel_min * rate^(node_count - 2)` and never exceeds this.
        hrel_max: f64,
        rate: f64,
        /// Caller-specified absolute maximum cell size.
        lmax: f64,
    },
}

impl MeshDistribution {
    pub fn kind(&self) -> DistributionKind {
        match self {
            MeshDistribution::Uniform { .. } => DistributionKind::Uniform,
            MeshDistribution::Geometric { anchor, .. } => anchor.kind(),
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            MeshDistribution::Uniform { node_count, .. }
            | MeshDistribution::Geometric { node_count, .. } => *node_count,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.node_count() - 1
    }

    /// Relative size of the cell at the coordinate-minimum end.
    pub fn h1rel(&self) -> f64 {
        match self {
            MeshDistribution::Uniform { cell_rel, .. } => *cell_rel,
            MeshDistribution::Geometric {
                anchor: Anchor::MinAtStart,
                hrel_min,
                ..
            } => *hrel_min,
            MeshDistribution::Geometric {
                anchor: Anchor::MinAtEnd,
                hrel_max,
                ..
            } => *hrel_max,
        }
    }

    /// Relative size of the cell at the coordinate-maximum end.
    pub fn h2rel(&self) -> f64 {
        match self {
            MeshDistribution::Uniform { cell_rel, .. } => *cell_rel,
            MeshDistribution::Geometric {
                anchor: Anchor::MinAtStart,
                hrel_max,
                ..
            } => *hrel_max,
            MeshDistribution::Geometric {
                anchor: Anchor::MinAtEnd,
                hrel_min,
                ..
            } => *hrel_min,
        }
    }

    /// Growth rate anchored at the first cell.
    pub fn r1(&self) -> f64 {
        match self {
            MeshDistribution::Uniform { .. } => UNIFORM_RATE_SENTINEL,
            MeshDistribution::Geometric {
                anchor: Anchor::MinAtStart,
                rate,
                ..
            } => *rate,
            MeshDistribution::Geometric { .. } => NO_GROWTH_RATE,
        }
    }

    /// Growth rate anchored at the last cell.
    pub fn r2(&self) -> f64 {
        match self {
            MeshDistribution::Uniform { .. } => UNIFORM_RATE_SENTINEL,
            MeshDistribution::Geometric {
                anchor: Anchor::MinAtEnd,
                rate,
                ..
            } => *rate,
            MeshDistribution::Geometric { .. } => NO_GROWTH_RATE,
        }
    }

    /// Growth rate magnitude. Uniform distributions report 1.
    pub fn rate(&self) -> f64 {
        match self {
            MeshDistribution::Uniform { .. } => NO_GROWTH_RATE,
            MeshDistribution::Geometric { rate, .. } => *rate,
        }
    }

    pub fn lmax(&self) -> f64 {
        match self {
            MeshDistribution::Uniform { lmax, .. } | MeshDistribution::Geometric { lmax, .. } => {
                *lmax
            }
        }
    }

    /// Relative size actually reached by the largest cell.
    pub fn achieved_max_rel(&self) -> f64 {
        match self {
            MeshDistribution::Uniform { node_count, .. } => 1.0 / (*node_count - 1) as f64,
            MeshDistribution::Geometric {
                node_count,
                hrel_min,
                rate,
                ..
            } => hrel_min * rate.powi(*node_count as i32 - 2),
        }
    }

    /// Absolute cell sizes along the coordinate direction.
    ///
    /// Uniform cells sum to `length`. Geometric cells are the prescribed
    /// sequence and sum to at most `length`; the meshing tool stretches them
    /// onto the edge.
    pub fn cell_sizes(&self, length: f64) -> Vec<f64> {
        match self {
            MeshDistribution::Uniform { node_count, .. } => {
                vec![length / (*node_count - 1) as f64; *node_count - 1]
            }
            MeshDistribution::Geometric {
                anchor,
                node_count,
                hrel_min,
                rate,
                ..
            } => {
                let first = hrel_min * length;
                let mut sizes: Vec<f64> = (0..*node_count - 1)
                    .map(|i| first * rate.powi(i as i32))
                    .collect();
                if *anchor == Anchor::MinAtEnd {
                    sizes.reverse();
                }
                sizes
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn geo(anchor: Anchor) -> MeshDistribution {
        MeshDistribution::Geometric {
            anchor,
            node_count: 5,
            hrel_min: 0.1,
            hrel_max: 0.4,
            rate: 1.5,
            lmax: 0.4,
        }
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("geo1".parse::<DistributionKind>().unwrap(), DistributionKind::Geometric1);
        assert_eq!("GEO2".parse::<DistributionKind>().unwrap(), DistributionKind::Geometric2);
        assert_eq!("uni".parse::<DistributionKind>().unwrap(), DistributionKind::Uniform);
        assert!(matches!(
            "bigeometric".parse::<DistributionKind>(),
            Err(SpacingError::UnknownKind(_))
        ));
    }

    #[test]
    fn test_geo1_accessors() {
        let d = geo(Anchor::MinAtStart);
        assert_eq!(d.kind(), DistributionKind::Geometric1);
        assert_eq!(d.h1rel(), 0.1);
        assert_eq!(d.h2rel(), 0.4);
        assert_eq!(d.r1(), 1.5);
        assert_eq!(d.r2(), NO_GROWTH_RATE);
    }

    #[test]
    fn test_geo2_mirrors_geo1() {
        let d = geo(Anchor::MinAtEnd);
        assert_eq!(d.kind(), DistributionKind::Geometric2);
        assert_eq!(d.h1rel(), 0.4);
        assert_eq!(d.h2rel(), 0.1);
        assert_eq!(d.r1(), NO_GROWTH_RATE);
        assert_eq!(d.r2(), 1.5);
    }

    #[test]
    fn test_uniform_reports_sentinel_rates() {
        let d = MeshDistribution::Uniform {
            node_count: 11,
            cell_rel: 0.1,
            lmax: 0.1,
        };
        assert_eq!(d.r1(), UNIFORM_RATE_SENTINEL);
        assert_eq!(d.r2(), UNIFORM_RATE_SENTINEL);
        assert_eq!(d.rate(), 1.0);
        assert_eq!(d.cell_count(), 10);
    }

    #[test]
    fn test_cell_sizes_follow_anchor() {
        let start = geo(Anchor::MinAtStart).cell_sizes(2.0);
        let end = geo(Anchor::MinAtEnd).cell_sizes(2.0);
        assert_eq!(start.len(), 4);
        assert_relative_eq!(start[0], 0.2);
        assert_relative_eq!(start[3], 0.2 * 1.5f64.powi(3));
        assert_relative_eq!(end[0], start[3]);
        assert_relative_eq!(end[3], start[0]);
    }

    #[test]
    fn test_achieved_max_rel() {
        assert_relative_eq!(geo(Anchor::MinAtStart).achieved_max_rel(), 0.1 * 1.5f64.powi(3));
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_value(geo(Anchor::MinAtEnd)).unwrap();
        assert_eq!(json["rule"], "geometric");
        assert_eq!(json["anchor"], "min_at_end");
        let back: MeshDistribution = serde_json::from_value(json).unwrap();
        assert_eq!(back, geo(Anchor::MinAtEnd));
    }
}
