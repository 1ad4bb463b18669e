//! Replay of a reference file onto new section lengths.

use mesh_spacing::{reimport_or_uniform, Section, SectionSet, SpacingConfig};
use tracing::{info, warn};

use crate::errors::ReplayError;
use crate::reference::{ReferenceEntry, ReferenceFile};

/// What happened to one section during replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayOutcome {
    Replayed,
    /// The scaled geometric bounds no longer fit; uniform with the scaled
    /// minimum size was used.
    FellBackToUniform,
    /// No entry for the section. It is left undistributed.
    Missing,
    /// The entry exists but carries no distribution.
    Undefined,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayReport {
    pub outcomes: Vec<(String, ReplayOutcome)>,
}

impl ReplayReport {
    pub fn outcome(&self, section: &str) -> Option<ReplayOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == section)
            .map(|(_, outcome)| *outcome)
    }

    pub fn count(&self, outcome: ReplayOutcome) -> usize {
        self.outcomes.iter().filter(|(_, o)| *o == outcome).count()
    }

    /// Sections that still need a distribution after replay.
    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, ReplayOutcome::Missing | ReplayOutcome::Undefined))
            .map(|(name, _)| name.as_str())
    }

    pub fn is_complete(&self) -> bool {
        self.unresolved().next().is_none()
    }
}

/// Distribute fresh copies of `sections` from `reference`, scaling every
/// cell size by `factor`.
///
/// The input sections are only read for their names and lengths; the
/// returned set holds new sections. Sections without a usable entry come
/// back undistributed and are listed in the report.
pub fn replay(
    reference: &ReferenceFile,
    sections: &SectionSet,
    factor: f64,
    config: &SpacingConfig,
) -> Result<(SectionSet, ReplayReport), ReplayError> {
    if !(factor.is_finite() && factor > 0.0) {
        return Err(ReplayError::InvalidFactor(factor));
    }

    let mut replayed = SectionSet::new();
    let mut report = ReplayReport::default();

    for (_, original) in sections.iter() {
        let name = original.name();
        let wrap = |source| ReplayError::Section {
            section: name.to_string(),
            source,
        };
        let mut section = Section::new(name, original.length()).map_err(wrap)?;

        let outcome = match reference.get(name) {
            Some(ReferenceEntry::Defined(record)) => {
                let result = reimport_or_uniform(record, section.length(), factor, config).map_err(wrap)?;
                section.apply(result.distribution).map_err(wrap)?;
                if result.fell_back {
                    ReplayOutcome::FellBackToUniform
                } else {
                    ReplayOutcome::Replayed
                }
            }
            Some(ReferenceEntry::Undefined) => ReplayOutcome::Undefined,
            None => {
                warn!(section = name, "no reference distribution");
                ReplayOutcome::Missing
            }
        };

        report.outcomes.push((name.to_string(), outcome));
        replayed.add(section).map_err(wrap)?;
    }

    info!(
        factor,
        replayed = report.count(ReplayOutcome::Replayed),
        fell_back = report.count(ReplayOutcome::FellBackToUniform),
        unresolved = report.unresolved().count(),
        "reference replay finished"
    );
    Ok((replayed, report))
}
