//! Code Analyzer Module
//!
//! Per-file structural analysis and the project rollup:
//! - Language detection and extractor dispatch
//! - Parse-tree and heuristic element extraction
//! - Line metrics, enrichment and narrative summaries
//! - File scanning with gitignore support

pub mod aggregate;
pub mod assembler;
pub mod enrich;
pub mod extractor;
pub mod language;
pub mod metrics;
pub mod scanner;

pub use aggregate::generate_project_summary;
pub use assembler::{FileAnalyzer, SharedAnalyzer, file_narrative};
pub use enrich::{
    ComplexityEnricher, Enricher, QualityEnricher, SecurityEnricher, SharedEnricher, SmellEnricher,
};
pub use extractor::{Extraction, Extractor, ExtractorRegistry};
pub use language::Language;
pub use metrics::FileMetrics;
pub use scanner::{FileScanner, ScannedFile};
