//! Unified Error Type System
//!
//! One error type (`ScopeError`) for the whole library. Most variants are
//! non-fatal at the file level: the assembler turns them into a best-effort
//! `FileAnalysis` plus a warning instead of aborting a review.
//!
//! ## Recovery
//!
//! - **UnsupportedLanguage**: zero-element extraction, metrics still computed
//! - **Parse**: heuristic fallback, record marked `degraded`
//! - **Encoding**: binary record with size only
//! - **Timeout**: metrics-only `skipped` record

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScopeError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Analysis Errors
    // -------------------------------------------------------------------------
    #[error("No extractor registered for {language}")]
    UnsupportedLanguage { language: String },

    #[error("Parse error in {path}: {message}")]
    Parse { message: String, path: String },

    #[error("Encoding error in {path}: {message}")]
    Encoding { message: String, path: String },

    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    // -------------------------------------------------------------------------
    // Ambient Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("Scan error: {0}")]
    Scan(String),

    #[error("Enrichment '{enricher}' failed: {message}")]
    Enrichment { enricher: String, message: String },
}

impl From<figment::Error> for ScopeError {
    fn from(err: figment::Error) -> Self {
        ScopeError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ScopeError {
    fn from(err: toml::ser::Error) -> Self {
        ScopeError::Config(err.to_string())
    }
}

impl From<ignore::Error> for ScopeError {
    fn from(err: ignore::Error) -> Self {
        ScopeError::Scan(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScopeError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl ScopeError {
    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a parse error for a file
    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Rewrite the path carried by path-scoped variants.
    ///
    /// Extractors only see content, so they report with an empty path and the
    /// assembler attaches the real one.
    pub fn at_path(mut self, file: &str) -> Self {
        match &mut self {
            Self::Parse { path, .. } | Self::Encoding { path, .. } => {
                *path = file.to_string();
            }
            _ => {}
        }
        self
    }

    /// Whether the file can still produce a best-effort record
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedLanguage { .. }
                | Self::Parse { .. }
                | Self::Encoding { .. }
                | Self::Timeout { .. }
                | Self::Enrichment { .. }
        )
    }
}
