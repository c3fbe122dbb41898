pub mod analysis;
pub mod element;
pub mod error;
pub mod summary;
pub mod utils;

pub use analysis::{ExtractionMode, FileAnalysis, Insights};
pub use element::{CodeElement, ElementKind};
pub use error::{Result, ScopeError};
pub use summary::{NamedCount, ProjectScale, ProjectSummary};
pub use utils::{log_filter_error, relative_path};
