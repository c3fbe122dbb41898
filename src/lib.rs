//! codescope - Structural Code Review
//!
//! Reads source files, extracts their structure (imports, classes,
//! functions, methods, variables, components) with line numbers, measures
//! lines and comments, and rolls every file up into a project review.
//!
//! ## Core Features
//!
//! - **Parse trees**: tree-sitter extraction for Python, JavaScript/TypeScript,
//!   Java, Kotlin, Go, Rust, C, C++, Ruby and Bash
//! - **Heuristics**: masked line rules for every other code language, and as
//!   the fallback when a parse tree contains errors
//! - **Enrichment**: pluggable [`Enricher`]s attach free-form insights;
//!   built-ins estimate complexity, flag code smells and security patterns,
//!   and score overall quality
//! - **Review pipeline**: bounded-concurrency async driver with a per-file
//!   time budget
//!
//! ## Quick Start
//!
//! ```ignore
//! use codescope::{analyze_file, generate_project_summary};
//!
//! let a = analyze_file("models.py", b"class User:\n    pass\n");
//! let b = analyze_file("main.go", b"package main\n\nfunc main() {}\n");
//! let summary = generate_project_summary(&[a, b]);
//! assert_eq!(summary.class_count, 1);
//! ```
//!
//! ## Modules
//!
//! - [`analyzer`]: language detection, extractors, metrics, assembly, rollup
//! - [`review`]: async review pipeline and report
//! - [`config`]: layered configuration
//! - [`types`]: records and errors

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod constants;
pub mod review;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{Result, ScopeError};

// Records
pub use types::{
    CodeElement, ElementKind, ExtractionMode, FileAnalysis, Insights, ProjectScale,
    ProjectSummary,
};

// =============================================================================
// Analyzer Re-exports
// =============================================================================

pub use analyzer::{
    ComplexityEnricher, Enricher, Extraction, Extractor, ExtractorRegistry, FileAnalyzer,
    FileScanner, Language, QualityEnricher, SecurityEnricher, SharedAnalyzer, SmellEnricher,
    generate_project_summary,
};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use review::{ProjectReview, ReviewPipeline, SourceFile};

/// Analyze one file with the built-in extractors and enrichers.
///
/// Builds a fresh [`FileAnalyzer`]; construct one yourself and share it by
/// `Arc` when analyzing many files.
pub fn analyze_file(path: &str, content: &[u8]) -> FileAnalysis {
    FileAnalyzer::default().analyze_file(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_level_entry_points() {
        let a = analyze_file("models.py", b"class User:\n    pass\n");
        let b = analyze_file("main.go", b"package main\n\nfunc main() {}\n");
        let c = analyze_file("notes.xyz", b"whatever\n");

        assert_eq!(c.language, "unknown");
        assert!(c.elements.is_empty());

        let summary = generate_project_summary(&[a, b, c]);
        assert_eq!(summary.file_count, 3);
        assert_eq!(summary.class_count, 1);
        assert_eq!(summary.function_count, 1);
    }

    #[test]
    fn test_analyze_file_is_deterministic() {
        let source = b"import os\n\ndef foo():\n    pass\n";
        let first = analyze_file("a.py", source);
        let second = analyze_file("a.py", source);
        assert_eq!(first, second);
    }
}
