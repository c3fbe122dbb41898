//! Structural Extractors
//!
//! Per-language strategies that turn source text into typed, line-located
//! elements.
//!
//! ## Strategies
//!
//! - Parse tree (tree-sitter): Python, JavaScript, TypeScript, JSX, TSX,
//!   Java, Kotlin, Go, Rust, C, C++, Ruby, Bash
//! - Heuristic (masked line rules): every other code language, and the
//!   fallback when a parse tree contains errors
//!
//! Strategies are looked up through an [`ExtractorRegistry`]:
//!
//! ```rust,ignore
//! use codescope::analyzer::extractor::ExtractorRegistry;
//! use codescope::analyzer::language::Language;
//!
//! let registry = ExtractorRegistry::with_defaults();
//! let extraction = registry.resolve(Language::Python).extract("def foo():\n    pass\n")?;
//! ```

pub mod bash;
pub mod clang;
pub mod go;
pub mod heuristic;
pub mod java;
pub mod kotlin;
pub mod python;
pub mod registry;
pub mod ruby;
pub mod rust_lang;
pub mod traits;
pub mod typescript;

pub use bash::BashExtractor;
pub use clang::{CExtractor, CppExtractor};
pub use go::GoExtractor;
pub use heuristic::HeuristicExtractor;
pub use java::JavaExtractor;
pub use kotlin::KotlinExtractor;
pub use python::PythonExtractor;
pub use registry::{ExtractorRegistry, NullExtractor, SharedExtractor};
pub use ruby::RubyExtractor;
pub use rust_lang::RustExtractor;
pub use traits::{
    Extraction, Extractor, create_ts_parser, element_at, field_text, get_node_text,
    parent_kind_is, parse_source, unquote, walk_scoped,
};
pub use typescript::{Dialect, TypeScriptExtractor};
