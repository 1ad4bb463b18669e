//! Flat export record and replay of a stored distribution.

use serde::{Deserialize, Serialize};

use crate::config::SpacingConfig;
use crate::distribution::{Anchor, DistributionKind, MeshDistribution};
use crate::error::{ensure_positive, SpacingError};
use crate::geometric::solve_geometric;
use crate::precision::Precision;
use crate::uniform::solve_uniform;

/// The persisted form of a [`MeshDistribution`]. Relative sizes and rates are
/// rounded to the configured precision; `lmax` is the caller's bound and is
/// kept verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub kind: DistributionKind,
    pub node_count: usize,
    pub h1rel: f64,
    pub h2rel: f64,
    pub r1: f64,
    pub r2: f64,
    pub lmax: f64,
}

impl ExportRecord {
    pub fn as_tuple(&self) -> (&'static str, usize, f64, f64, f64, f64, f64) {
        (
            self.kind.as_str(),
            self.node_count,
            self.h1rel,
            self.h2rel,
            self.r1,
            self.r2,
            self.lmax,
        )
    }

    /// `"{kind} {n} {h1rel} {h2rel} {r1} {r2} {lmax}"`.
    pub fn to_line(&self) -> String {
        format!(
            "{} {} {} {} {} {} {}",
            self.kind, self.node_count, self.h1rel, self.h2rel, self.r1, self.r2, self.lmax
        )
    }

    /// Parse the output of [`ExportRecord::to_line`].
    pub fn parse(line: &str) -> Result<Self, SpacingError> {
        let malformed = |reason: String| SpacingError::MalformedRecord {
            record: line.to_string(),
            reason,
        };

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 7 {
            return Err(malformed(format!("expected 7 fields, found {}", fields.len())));
        }

        let kind: DistributionKind = fields[0].parse()?;
        let node_count: usize = fields[1]
            .parse()
            .map_err(|_| malformed(format!("node count '{}' is not an integer", fields[1])))?;
        if node_count < 2 {
            return Err(malformed(format!("node count {node_count} is below 2")));
        }

        let mut values = [0.0; 5];
        for (value, field) in values.iter_mut().zip(&fields[2..]) {
            *value = field
                .parse()
                .map_err(|_| malformed(format!("'{field}' is not a number")))?;
        }
        let [h1rel, h2rel, r1, r2, lmax] = values;

        Ok(Self {
            kind,
            node_count,
            h1rel,
            h2rel,
            r1,
            r2,
            lmax,
        })
    }
}

impl MeshDistribution {
    /// Flatten to an [`ExportRecord`].
    pub fn export(&self, precision: Precision) -> ExportRecord {
        ExportRecord {
            kind: self.kind(),
            node_count: self.node_count(),
            h1rel: precision.round(self.h1rel()),
            h2rel: precision.round(self.h2rel()),
            r1: precision.round(self.r1()),
            r2: precision.round(self.r2()),
            lmax: self.lmax(),
        }
    }

    /// Recompute a distribution from a stored record against `length`.
    ///
    /// Absolute cell sizes are re-derived from the relative fractions times
    /// `scale_factor * length`; the stored node count and rates are ignored
    /// and solved afresh. A factor above 1 coarsens, below 1 refines.
    ///
    /// A uniform record replayed on the length it was solved for uses its
    /// stored `lmax`: the rounded `h1rel` alone cannot reproduce the cell
    /// count when `length / h` is close to an integer.
    pub fn reimport(
        record: &ExportRecord,
        length: f64,
        scale_factor: f64,
        config: &SpacingConfig,
    ) -> Result<MeshDistribution, SpacingError> {
        ensure_positive("length", length)?;
        ensure_positive("scale factor", scale_factor)?;
        let absolute = |rel: f64| scale_factor * rel * length;

        match record.kind {
            DistributionKind::Uniform => {
                let cell = uniform_cell_size(record, length, config.precision);
                solve_uniform(length, scale_factor * cell, config)
            }
            DistributionKind::Geometric1 => solve_geometric(
                length,
                absolute(record.h1rel),
                absolute(record.h2rel),
                Anchor::MinAtStart,
                config,
            ),
            DistributionKind::Geometric2 => solve_geometric(
                length,
                absolute(record.h2rel),
                absolute(record.h1rel),
                Anchor::MinAtEnd,
                config,
            ),
        }
    }
}

/// Unscaled cell size of a uniform record on `length`.
fn uniform_cell_size(record: &ExportRecord, length: f64, precision: Precision) -> f64 {
    let relative = record.h1rel * length;
    // `h1rel` is only known to within one step; inside that band `lmax` is
    // the same cell.
    if (relative - record.lmax).abs() <= precision.step() * length {
        record.lmax
    } else {
        relative
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::UNIFORM_RATE_SENTINEL;

    #[test]
    fn test_line_format() {
        let record = ExportRecord {
            kind: DistributionKind::Geometric1,
            node_count: 42,
            h1rel: 0.01,
            h2rel: 0.05,
            r1: 1.040123,
            r2: 1.0,
            lmax: 0.05,
        };
        assert_eq!(record.to_line(), "geo1 42 0.01 0.05 1.040123 1 0.05");
        assert_eq!(ExportRecord::parse(&record.to_line()).unwrap(), record);
    }

    #[test]
    fn test_uniform_export() {
        let d = solve_uniform(2.0, 0.1, &SpacingConfig::default()).unwrap();
        let record = d.export(Precision::default());
        assert_eq!(
            record.as_tuple(),
            ("uniform", 21, 0.05, 0.05, UNIFORM_RATE_SENTINEL, UNIFORM_RATE_SENTINEL, 0.1)
        );
    }

    #[test]
    fn test_parse_rejects_malformed_lines() {
        assert!(matches!(
            ExportRecord::parse("geo1 42 0.01"),
            Err(SpacingError::MalformedRecord { .. })
        ));
        assert!(matches!(
            ExportRecord::parse("geo3 42 0.01 0.05 1.04 1 0.05"),
            Err(SpacingError::UnknownKind(_))
        ));
        assert!(matches!(
            ExportRecord::parse("geo1 4x2 0.01 0.05 1.04 1 0.05"),
            Err(SpacingError::MalformedRecord { .. })
        ));
        assert!(matches!(
            ExportRecord::parse("geo1 42 0.01 abc 1.04 1 0.05"),
            Err(SpacingError::MalformedRecord { .. })
        ));
        assert!(matches!(
            ExportRecord::parse("uniform 1 0.5 0.5 2 2 0.5"),
            Err(SpacingError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_reimport_geo2_restores_anchor() {
        let config = SpacingConfig::default();
        let d = solve_geometric(1.5, 0.003, 0.06, Anchor::MinAtEnd, &config).unwrap();
        let back = MeshDistribution::reimport(&d.export(config.precision), 1.5, 1.0, &config).unwrap();
        assert_eq!(back.kind(), DistributionKind::Geometric2);
        assert_eq!(back.node_count(), d.node_count());
        assert_eq!(back.r2(), d.r2());
        assert_eq!(back.h1rel(), d.h1rel());
        assert_eq!(back.h2rel(), d.h2rel());
    }

    #[test]
    fn test_uniform_round_trip_with_inexact_ratio() {
        let config = SpacingConfig::default();
        let d = solve_uniform(3.0, 0.1, &config).unwrap();
        let record = d.export(config.precision);
        assert_eq!(record.h1rel, 0.033333);
        assert_eq!(record.lmax, 0.1);
        let back = MeshDistribution::reimport(&record, 3.0, 1.0, &config).unwrap();
        assert_eq!(back.node_count(), 31);
        assert_eq!(back, d);
    }

    #[test]
    fn test_uniform_reimport_on_new_length_uses_relative_size() {
        let config = SpacingConfig::default();
        let d = solve_uniform(3.0, 0.1, &config).unwrap();
        let record = d.export(config.precision);
        // 0.033333 * 6 = 0.199998 per cell on twice the length.
        let back = MeshDistribution::reimport(&record, 6.0, 1.0, &config).unwrap();
        assert_eq!(back.node_count(), 32);
        assert_eq!(back.lmax(), 0.033333 * 6.0);
    }

    #[test]
    fn test_lmax_exported_verbatim() {
        let config = SpacingConfig::default();
        let d = solve_uniform(1.0, 0.123_456_789, &config).unwrap();
        let record = d.export(config.precision);
        assert_eq!(record.lmax, 0.123_456_789);
        assert_eq!(record.h1rel, 0.123457);
    }

    #[test]
    fn test_reimport_with_coarsening_factor() {
        let config = SpacingConfig::default();
        let d = solve_uniform(1.0, 0.1, &config).unwrap();
        let coarse = MeshDistribution::reimport(&d.export(config.precision), 1.0, 2.0, &config).unwrap();
        assert_eq!(coarse.node_count(), 6);
    }

    #[test]
    fn test_reimport_rejects_non_positive_factor() {
        let config = SpacingConfig::default();
        let d = solve_uniform(1.0, 0.1, &config).unwrap();
        assert!(matches!(
            MeshDistribution::reimport(&d.export(config.precision), 1.0, 0.0, &config),
            Err(SpacingError::InvalidInput { what: "scale factor", .. })
        ));
    }
}
