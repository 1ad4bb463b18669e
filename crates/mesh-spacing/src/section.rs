use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::SpacingConfig;
use crate::distribution::{Anchor, MeshDistribution};
use crate::error::{ensure_positive, SpacingError};
use crate::geometric::solve_geometric;
use crate::precision::Precision;
use crate::uniform::solve_uniform;

/// An edge length awaiting (or holding) a node distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    name: String,
    length: f64,
    distribution: Option<MeshDistribution>,
}

impl Section {
    pub fn new(name: impl Into<String>, length: f64) -> Result<Self, SpacingError> {
        ensure_positive("section length", length)?;
        Ok(Self {
            name: name.into(),
            length,
            distribution: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn distribution(&self) -> Option<&MeshDistribution> {
        self.distribution.as_ref()
    }

    /// Attach a distribution. A section is distributed at most once.
    pub fn apply(&mut self, distribution: MeshDistribution) -> Result<&MeshDistribution, SpacingError> {
        if self.distribution.is_some() {
            return Err(SpacingError::AlreadyDistributed {
                section: self.name.clone(),
            });
        }
        info!(
            section = %self.name,
            rule = %distribution.kind(),
            nodes = distribution.node_count(),
            "section distributed"
        );
        Ok(self.distribution.insert(distribution))
    }

    pub fn distribute_uniform(
        &mut self,
        max_cell_size: f64,
        config: &SpacingConfig,
    ) -> Result<&MeshDistribution, SpacingError> {
        let distribution = solve_uniform(self.length, max_cell_size, config)?;
        self.apply(distribution)
    }

    pub fn distribute_geometric(
        &mut self,
        min_cell_size: f64,
        max_cell_size: f64,
        anchor: Anchor,
        config: &SpacingConfig,
    ) -> Result<&MeshDistribution, SpacingError> {
        let distribution = solve_geometric(self.length, min_cell_size, max_cell_size, anchor, config)?;
        self.apply(distribution)
    }

    /// A new section of the same length with every cell size scaled by
    /// `factor`, re-solved from the stored relative sizes.
    pub fn refine(&self, factor: f64, config: &SpacingConfig) -> Result<Section, SpacingError> {
        self.resized(self.length, factor, config)
    }

    /// A new section of `length` whose distribution is replayed from this
    /// one's relative sizes scaled by `factor`.
    pub fn resized(&self, length: f64, factor: f64, config: &SpacingConfig) -> Result<Section, SpacingError> {
        let distribution = self.distribution.as_ref().ok_or_else(|| SpacingError::Undistributed {
            section: self.name.clone(),
        })?;
        let record = distribution.export(config.precision);
        let mut section = Section::new(self.name.clone(), length)?;
        section.apply(MeshDistribution::reimport(&record, length, factor, config)?)?;
        Ok(section)
    }
}

/// One-line summary in millimetres.
impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = Precision::default();
        let mm = |metres: f64| p.round(metres * 1000.0);

        match &self.distribution {
            None => write!(f, "{}: no distribution defined", self.name),
            Some(d @ MeshDistribution::Uniform { lmax, .. }) => write!(
                f,
                "{}: {} cells, uniform distribution, cell size {} <= {} mm",
                self.name,
                d.cell_count(),
                mm(self.length / d.cell_count() as f64),
                mm(*lmax)
            ),
            Some(
                d @ MeshDistribution::Geometric {
                    hrel_min,
                    hrel_max,
                    rate,
                    ..
                },
            ) => write!(
                f,
                "{}: {} cells, {} distribution, min cell size {} mm, max cell size {} <= {} mm, rate {}",
                self.name,
                d.cell_count(),
                d.kind(),
                mm(hrel_min * self.length),
                mm(d.achieved_max_rel() * self.length),
                mm(hrel_max * self.length),
                rate
            ),
        }
    }
}

/// Index of a section within its [`SectionSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionId(usize);

impl SectionId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Sections of one run, in insertion order with unique names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectionSet {
    sections: Vec<Section>,
}

impl SectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, section: Section) -> Result<SectionId, SpacingError> {
        if self.find(section.name()).is_some() {
            return Err(SpacingError::DuplicateSection(section.name.clone()));
        }
        let id = SectionId(self.sections.len());
        self.sections.push(section);
        Ok(id)
    }

    pub fn get(&self, id: SectionId) -> Option<&Section> {
        self.sections.get(id.0)
    }

    pub fn get_mut(&mut self, id: SectionId) -> Option<&mut Section> {
        self.sections.get_mut(id.0)
    }

    pub fn find(&self, name: &str) -> Option<SectionId> {
        self.sections.iter().position(|s| s.name == name).map(SectionId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectionId, &Section)> {
        self.sections.iter().enumerate().map(|(i, s)| (SectionId(i), s))
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn sections_mut(&mut self) -> &mut [Section] {
        &mut self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
