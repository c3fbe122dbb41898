use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::json;

use super::{
    ComplexityEnricher, Enricher, Finding, SecurityEnricher, Severity, SmellEnricher,
};
use crate::constants::findings::{COMPLEXITY_PENALTIES, SECURITY_PENALTY, SMELL_PENALTY};
use crate::types::{ExtractionMode, FileAnalysis, Insights, Result};

static SHORT_ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-z_]{1,2}\s*=[^=]").unwrap());

/// One improvement the author could make; `line` is null for file-wide advice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub message: String,
    pub line: Option<u32>,
    pub priority: Severity,
}

impl Suggestion {
    fn located(kind: &'static str, finding: &Finding) -> Self {
        Self {
            kind,
            message: finding.message.clone(),
            line: Some(finding.line),
            priority: finding.severity,
        }
    }

    fn general(kind: &'static str, message: &str, priority: Severity) -> Self {
        Self {
            kind,
            message: message.to_string(),
            line: None,
            priority,
        }
    }
}

/// 0-100 quality score with improvement suggestions.
///
/// Produces `{"quality_score": n, "improvement_suggestions": [..]}`. The
/// score starts at 100 and loses points per smell, per security issue and
/// for high keyword complexity. Smells and issues are recomputed here rather
/// than read from other enrichers.
pub struct QualityEnricher;

impl QualityEnricher {
    pub fn score(smells: usize, issues: usize, decision_points: usize) -> i64 {
        let complexity_penalty = COMPLEXITY_PENALTIES
            .iter()
            .find(|(above, _)| decision_points > *above)
            .map_or(0, |(_, penalty)| *penalty);

        let score = 100
            - smells as i64 * SMELL_PENALTY
            - issues as i64 * SECURITY_PENALTY
            - complexity_penalty;
        score.clamp(0, 100)
    }

    pub fn suggestions(
        smells: &[Finding],
        issues: &[Finding],
        decision_points: usize,
        content: &str,
    ) -> Vec<Suggestion> {
        let mut suggestions: Vec<Suggestion> = smells
            .iter()
            .map(|smell| Suggestion::located("code_smell", smell))
            .chain(issues.iter().map(|issue| Suggestion::located("security", issue)))
            .collect();

        if ComplexityEnricher::rating(decision_points) == "high" {
            suggestions.push(Suggestion::general(
                "refactoring",
                "Consider refactoring complex code sections into smaller, more manageable functions.",
                Severity::Medium,
            ));
        }
        if SHORT_ASSIGNMENT.is_match(content) {
            suggestions.push(Suggestion::general(
                "naming",
                "Consider using more descriptive variable names instead of short abbreviations.",
                Severity::Low,
            ));
        }
        suggestions
    }
}

impl Enricher for QualityEnricher {
    fn name(&self) -> &'static str {
        "quality"
    }

    fn enrich(&self, analysis: &FileAnalysis, content: &str) -> Result<Insights> {
        let mut insights = Insights::new();
        if matches!(
            analysis.extraction,
            ExtractionMode::Binary | ExtractionMode::Skipped | ExtractionMode::None
        ) {
            return Ok(insights);
        }

        let smells = SmellEnricher::detect(analysis, content);
        let issues = SecurityEnricher::detect(content);
        let decision_points = ComplexityEnricher::decision_points(content);

        insights.insert(
            "quality_score".to_string(),
            json!(Self::score(smells.len(), issues.len(), decision_points)),
        );
        insights.insert(
            "improvement_suggestions".to_string(),
            json!(Self::suggestions(&smells, &issues, decision_points, content)),
        );
        Ok(insights)
    }
}
