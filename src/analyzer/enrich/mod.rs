//! Enrichment hook
//!
//! Enrichers attach free-form insights to a finished [`FileAnalysis`]. They
//! run after extraction and metrics, and their output goes through
//! [`FileAnalysis::merge_insights`], so they cannot overwrite core fields.
//!
//! ## Built-in Enrichers
//!
//! | Enricher | Insight keys |
//! |----------|--------------|
//! | [`ComplexityEnricher`] | `complexity` |
//! | [`SmellEnricher`] | `code_smells` |
//! | [`SecurityEnricher`] | `security_issues` |
//! | [`QualityEnricher`] | `quality_score`, `improvement_suggestions` |
//!
//! Each one works from the record and the text alone; none reads another
//! enricher's output, so registration order does not matter.

mod complexity;
mod quality;
mod security;
mod smells;

use std::sync::Arc;

use serde::Serialize;

use crate::types::{FileAnalysis, Insights, Result};

pub use complexity::ComplexityEnricher;
pub use quality::QualityEnricher;
pub use security::SecurityEnricher;
pub use smells::SmellEnricher;

pub trait Enricher: Send + Sync {
    fn name(&self) -> &'static str;

    /// Insights for one file. `content` is the decoded text even when the
    /// record itself does not keep it.
    fn enrich(&self, analysis: &FileAnalysis, content: &str) -> Result<Insights>;
}

pub type SharedEnricher = Arc<dyn Enricher>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A pattern hit located in the file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub message: String,
    pub line: u32,
    pub severity: Severity,
}

impl Finding {
    pub fn new(kind: &'static str, message: impl Into<String>, line: u32, severity: Severity) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            severity,
        }
    }
}

/// 1-based line holding the byte at `offset`
fn line_at(content: &str, offset: usize) -> u32 {
    let newlines = content.as_bytes()[..offset.min(content.len())]
        .iter()
        .filter(|b| **b == b'\n')
        .count();
    newlines as u32 + 1
}
