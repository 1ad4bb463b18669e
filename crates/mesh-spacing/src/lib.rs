//! One-dimensional mesh spacing.
//!
//! Given an edge length and target cell sizes, computes the node count and
//! growth rate that a block-structured mesher needs for that edge. Uniform and
//! geometric (single-sided growth) rules are supported; results are plain
//! records that can be exported to a text line and replayed against a new
//! length or under a refinement factor.

pub mod config;
pub mod distribution;
pub mod error;
pub mod export;
pub mod geometric;
pub mod policy;
pub mod precision;
pub mod section;
pub mod uniform;

pub use config::SpacingConfig;
pub use distribution::{Anchor, DistributionKind, MeshDistribution, NO_GROWTH_RATE, UNIFORM_RATE_SENTINEL};
pub use error::{Infeasibility, SpacingError};
pub use export::ExportRecord;
pub use geometric::{fit_relative, rate_for, series_sum, solve_geometric, GeometricFit};
pub use policy::{reimport_or_uniform, solve_or_uniform, PolicyOutcome};
pub use precision::Precision;
pub use section::{Section, SectionId, SectionSet};
pub use uniform::solve_uniform;
