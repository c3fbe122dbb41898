use std::sync::LazyLock;

use regex::Regex;
use serde_json::json;

use super::Enricher;
use crate::analyzer::language::Language;
use crate::constants::complexity::{HIGH_THRESHOLD, INDENT_WIDTH, MEDIUM_THRESHOLD};
use crate::types::{ExtractionMode, FileAnalysis, Insights, Result};

static DECISION_POINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:if|for|while|switch|catch)\b").unwrap());

/// Keyword-count complexity estimate.
///
/// Produces `{"complexity": {"cyclomatic", "max_nested_depth", "rating"}}`.
pub struct ComplexityEnricher;

impl ComplexityEnricher {
    pub fn decision_points(content: &str) -> usize {
        DECISION_POINT.find_iter(content).count()
    }

    /// Deepest indentation level among non-comment lines
    pub fn max_nesting(content: &str, language: Language) -> usize {
        let syntax = language.comment_syntax();
        content
            .lines()
            .filter(|line| {
                let trimmed = line.trim_start();
                !trimmed.is_empty()
                    && !trimmed.starts_with('*')
                    && !syntax.line.iter().any(|m| trimmed.starts_with(m))
                    && !syntax.block.iter().any(|(open, _)| trimmed.starts_with(open))
            })
            .map(|line| {
                let width: usize = line
                    .chars()
                    .take_while(|c| c.is_whitespace())
                    .map(|c| if c == '\t' { INDENT_WIDTH } else { 1 })
                    .sum();
                width / INDENT_WIDTH
            })
            .max()
            .unwrap_or(0)
    }

    pub fn rating(decision_points: usize) -> &'static str {
        if decision_points < MEDIUM_THRESHOLD {
            "low"
        } else if decision_points < HIGH_THRESHOLD {
            "medium"
        } else {
            "high"
        }
    }
}

impl Enricher for ComplexityEnricher {
    fn name(&self) -> &'static str {
        "complexity"
    }

    fn enrich(&self, analysis: &FileAnalysis, content: &str) -> Result<Insights> {
        let mut insights = Insights::new();
        if analysis.extraction == ExtractionMode::Binary {
            return Ok(insights);
        }

        let language: Language = analysis.language.parse().unwrap_or_default();
        let cyclomatic = Self::decision_points(content);
        insights.insert(
            "complexity".to_string(),
            json!({
                "cyclomatic": cyclomatic,
                "max_nested_depth": Self::max_nesting(content, language),
                "rating": Self::rating(cyclomatic),
            }),
        );
        Ok(insights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_points_are_whole_words() {
        let source = "if x:\n    for y in z:\n        while True: pass\nelif_value = iffy\n";
        assert_eq!(ComplexityEnricher::decision_points(source), 3);
    }

    #[test]
    fn test_max_nesting_skips_comments() {
        let source = "fn a() {\n    if b {\n        c();\n    }\n}\n                // deep comment\n";
        assert_eq!(ComplexityEnricher::max_nesting(source, Language::Rust), 2);
        assert_eq!(ComplexityEnricher::max_nesting("", Language::Rust), 0);
        assert_eq!(ComplexityEnricher::max_nesting("\t\tx\n", Language::Go), 2);
    }

    #[test]
    fn test_rating_thresholds() {
        assert_eq!(ComplexityEnricher::rating(4), "low");
        assert_eq!(ComplexityEnricher::rating(5), "medium");
        assert_eq!(ComplexityEnricher::rating(9), "medium");
        assert_eq!(ComplexityEnricher::rating(10), "high");
    }

    #[test]
    fn test_enrich_output_shape() {
        let analysis = FileAnalysis::empty("a.py", "Python", 0, ExtractionMode::Syntax);
        let insights = ComplexityEnricher
            .enrich(&analysis, "if a:\n    pass\n")
            .unwrap();
        assert_eq!(
            insights["complexity"],
            json!({"cyclomatic": 1, "max_nested_depth": 1, "rating": "low"})
        );
    }

    #[test]
    fn test_binary_records_get_nothing() {
        let analysis = FileAnalysis::empty("a.bin", "unknown", 4, ExtractionMode::Binary);
        assert!(ComplexityEnricher.enrich(&analysis, "").unwrap().is_empty());
    }
}
