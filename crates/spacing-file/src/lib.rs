pub mod errors;
pub mod load;
pub mod reference;
pub mod replay;
pub mod save;

pub use errors::{LoadError, ReplayError};
pub use load::load_project;
pub use reference::{ReferenceEntry, ReferenceFile};
pub use replay::{replay, ReplayOutcome, ReplayReport};
pub use save::{save_project, SectionRecord, FORMAT_TAG, FORMAT_VERSION};
