use mesh_spacing::SpacingError;

/// Errors while reading a reference file or project document.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    #[error("failed to parse file: {0}")]
    ParseError(String),

    #[error("unknown file format: {0}")]
    UnknownFormat(String),

    #[error("file version {file_version} is newer than supported version {supported_version}")]
    FutureVersion {
        file_version: u32,
        supported_version: u32,
    },

    #[error("line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    #[error("section '{section}': {source}")]
    InvalidSection {
        section: String,
        source: SpacingError,
    },
}

/// Errors while replaying a reference file onto sections.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ReplayError {
    #[error("refinement factor must be positive, got {0}")]
    InvalidFactor(f64),

    #[error("section '{section}': {source}")]
    Section {
        section: String,
        source: SpacingError,
    },
}
