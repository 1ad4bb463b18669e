use mesh_spacing::{MeshDistribution, Section, SectionSet, SpacingConfig, SpacingError};
use serde::Deserialize;

use crate::errors::LoadError;
use crate::save::{SectionRecord, FORMAT_TAG, FORMAT_VERSION};

/// The top-level file structure for deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct SpacingFileRaw {
    pub format: String,
    pub version: u32,
    #[serde(default)]
    pub config: SpacingConfig,
    pub sections: Vec<SectionRecord>,
}

/// Deserialize a project from a JSON string.
///
/// Validates the format identifier and version, then recomputes every stored
/// distribution from its relative sizes. A record whose node count disagrees
/// with the recomputation is rejected.
pub fn load_project(json: &str) -> Result<(SectionSet, SpacingConfig), LoadError> {
    let raw: SpacingFileRaw =
        serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;

    if raw.format != FORMAT_TAG {
        return Err(LoadError::UnknownFormat(raw.format));
    }
    if raw.version > FORMAT_VERSION {
        return Err(LoadError::FutureVersion {
            file_version: raw.version,
            supported_version: FORMAT_VERSION,
        });
    }

    let config = raw.config;
    let mut sections = SectionSet::new();
    for record in raw.sections {
        let invalid = |source: SpacingError| LoadError::InvalidSection {
            section: record.name.clone(),
            source,
        };

        let mut section = Section::new(record.name.clone(), record.length).map_err(invalid)?;
        if let Some(stored) = &record.distribution {
            let distribution =
                MeshDistribution::reimport(stored, record.length, 1.0, &config).map_err(invalid)?;
            if distribution.node_count() != stored.node_count {
                return Err(invalid(SpacingError::MalformedRecord {
                    record: stored.to_line(),
                    reason: format!(
                        "stored node count {} does not match recomputed {}",
                        stored.node_count,
                        distribution.node_count()
                    ),
                }));
            }
            section.apply(distribution).map_err(invalid)?;
        }
        sections.add(section).map_err(invalid)?;
    }

    Ok((sections, config))
}
