use mesh_spacing::{ExportRecord, SectionSet, SpacingConfig};
use serde::{Deserialize, Serialize};

/// Current project document version.
pub const FORMAT_VERSION: u32 = 1;

/// Format identifier written into every project document.
pub const FORMAT_TAG: &str = "mesh-spacing";

/// One section as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub name: String,
    /// Edge length in metres.
    pub length: f64,
    pub distribution: Option<ExportRecord>,
}

/// The top-level file structure.
#[derive(Debug, Clone, Serialize)]
pub struct SpacingFile {
    /// Format identifier.
    pub format: String,
    /// Format version number.
    pub version: u32,
    /// Solver settings the distributions were computed with.
    pub config: SpacingConfig,
    pub sections: Vec<SectionRecord>,
}

/// Serialize sections and config to a pretty-printed JSON string.
pub fn save_project(sections: &SectionSet, config: &SpacingConfig) -> String {
    let file = SpacingFile {
        format: FORMAT_TAG.to_string(),
        version: FORMAT_VERSION,
        config: *config,
        sections: sections
            .sections()
            .iter()
            .map(|s| SectionRecord {
                name: s.name().to_string(),
                length: s.length(),
                distribution: s.distribution().map(|d| d.export(config.precision)),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&file).expect("SpacingFile serialization should never fail")
}
