//! File Analysis Assembler
//!
//! Combines extraction, metrics and enrichment into one [`FileAnalysis`].
//! Assembly is pure: the caller supplies the bytes, nothing is read here.
//!
//! ## Recovery
//!
//! Every input produces a record:
//! - NUL bytes or invalid UTF-8: `binary` record with size only
//! - Parse-tree failure: heuristic result, `degraded`, warning recorded
//! - Unknown language: zero elements, metrics still computed
//! - Enricher failure: warning recorded, other enrichers still run

use std::sync::Arc;

use tracing::{debug, warn};

use super::enrich::{
    ComplexityEnricher, Enricher, QualityEnricher, SecurityEnricher, SharedEnricher, SmellEnricher,
};
use super::extractor::{Extraction, ExtractorRegistry};
use super::language::Language;
use super::metrics::FileMetrics;
use crate::constants::analysis::{BINARY_SNIFF_BYTES, WELL_DOCUMENTED_RATIO};
use crate::types::{ElementKind, ExtractionMode, FileAnalysis, ScopeError};

/// Shared analyzer for concurrent access
pub type SharedAnalyzer = Arc<FileAnalyzer>;

/// Analysis context: extractor registry, enrichers and record options.
pub struct FileAnalyzer {
    registry: ExtractorRegistry,
    enrichers: Vec<SharedEnricher>,
    include_content: bool,
}

impl FileAnalyzer {
    pub fn new(registry: ExtractorRegistry) -> Self {
        Self {
            registry,
            enrichers: Vec::new(),
            include_content: true,
        }
    }

    pub fn with_enricher(mut self, enricher: impl Enricher + 'static) -> Self {
        self.enrichers.push(Arc::new(enricher));
        self
    }

    /// Whether records keep the decoded file text
    pub fn with_content(mut self, include_content: bool) -> Self {
        self.include_content = include_content;
        self
    }

    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }

    pub fn enricher_names(&self) -> Vec<&'static str> {
        self.enrichers.iter().map(|e| e.name()).collect()
    }

    /// Analyze raw file bytes.
    pub fn analyze_file(&self, path: &str, content: &[u8]) -> FileAnalysis {
        let language = Language::from_path(path);
        let size = content.len() as u64;

        if is_binary(content) {
            debug!("{}: NUL byte in leading content, treating as binary", path);
            return binary_record(path, language, size, "binary content detected");
        }

        match std::str::from_utf8(content) {
            Ok(text) => self.analyze_text(path, text),
            Err(e) => {
                let err = ScopeError::Encoding {
                    message: e.to_string(),
                    path: path.to_string(),
                };
                debug!("{}", err);
                binary_record(path, language, size, err.to_string())
            }
        }
    }

    /// Analyze already-decoded text.
    pub fn analyze_text(&self, path: &str, text: &str) -> FileAnalysis {
        let language = Language::from_path(path);
        let mut warnings = Vec::new();
        let extraction = self.extract(path, language, text, &mut warnings);
        let metrics = FileMetrics::compute(text, language);

        let mut analysis = FileAnalysis {
            path: path.to_string(),
            language: language.as_str().to_string(),
            size: metrics.size,
            line_count: metrics.line_count,
            comment_count: metrics.comment_count,
            comment_ratio: metrics.comment_ratio,
            extraction: extraction.mode,
            elements: extraction.elements,
            summary: String::new(),
            warnings,
            content: if self.include_content {
                text.to_string()
            } else {
                String::new()
            },
            insights: None,
        };
        analysis.summary = file_narrative(&analysis);

        for enricher in &self.enrichers {
            match enricher.enrich(&analysis, text) {
                Ok(insights) => {
                    analysis.merge_insights(enricher.name(), insights);
                }
                Err(e) => {
                    warn!("{}: enricher '{}' failed: {}", path, enricher.name(), e);
                    analysis.warnings.push(e.to_string());
                }
            }
        }

        analysis
    }

    fn extract(
        &self,
        path: &str,
        language: Language,
        text: &str,
        warnings: &mut Vec<String>,
    ) -> Extraction {
        if !self.registry.is_registered(language) {
            let err = ScopeError::UnsupportedLanguage {
                language: language.as_str().to_string(),
            };
            debug!("{}: {}", path, err);
        }

        let err = match self.registry.resolve(language).extract(text) {
            Ok(extraction) => return extraction,
            Err(e) => e.at_path(path),
        };

        debug!("{}; falling back to heuristic extraction", err);
        warnings.push(err.to_string());

        match self.registry.fallback(language).extract(text) {
            Ok(fallback) => Extraction::new(ExtractionMode::Degraded, fallback.elements),
            Err(e) => {
                warnings.push(e.at_path(path).to_string());
                Extraction::new(ExtractionMode::Degraded, Vec::new())
            }
        }
    }
}

impl Default for FileAnalyzer {
    /// Built-in extractors and every built-in enricher
    fn default() -> Self {
        Self::new(ExtractorRegistry::with_defaults())
            .with_enricher(ComplexityEnricher)
            .with_enricher(SmellEnricher)
            .with_enricher(SecurityEnricher)
            .with_enricher(QualityEnricher)
    }
}

fn is_binary(content: &[u8]) -> bool {
    content.iter().take(BINARY_SNIFF_BYTES).any(|b| *b == 0)
}

fn binary_record(
    path: &str,
    language: Language,
    size: u64,
    warning: impl Into<String>,
) -> FileAnalysis {
    let mut record = FileAnalysis::empty(path, language.as_str(), size, ExtractionMode::Binary)
        .with_warning(warning);
    record.summary = file_narrative(&record);
    record
}

/// One-sentence description of a file, e.g.
/// `Python file containing 2 imports, 1 functions with 40 lines with some documentation (5% comments)`.
pub fn file_narrative(analysis: &FileAnalysis) -> String {
    let mut parts = Vec::new();

    if analysis.language != Language::Unknown.as_str() {
        parts.push(format!("{} file", analysis.language));
    }

    if analysis.elements.is_empty() {
        parts.push("with no significant code elements".to_string());
    } else {
        let groups: Vec<String> = [
            (ElementKind::Import, "imports"),
            (ElementKind::Class, "classes"),
            (ElementKind::Function, "functions"),
            (ElementKind::Method, "methods"),
            (ElementKind::Component, "components"),
        ]
        .iter()
        .filter_map(|(kind, label)| {
            let count = analysis.count(*kind);
            (count > 0).then(|| format!("{} {}", count, label))
        })
        .collect();
        if !groups.is_empty() {
            parts.push(format!("containing {}", groups.join(", ")));
        }
    }

    if analysis.line_count > 0 {
        parts.push(format!("with {} lines", analysis.line_count));
    }

    let percent = FileMetrics::comment_percent(analysis.comment_ratio);
    if analysis.comment_ratio > WELL_DOCUMENTED_RATIO {
        parts.push(format!("well-documented ({}% comments)", percent));
    } else if analysis.comment_ratio > 0.0 {
        parts.push(format!("with some documentation ({}% comments)", percent));
    }

    parts.join(" ")
}
