use std::sync::LazyLock;

use regex::Regex;
use serde_json::json;

use super::{Enricher, Finding, Severity, line_at};
use crate::constants::findings::{LONG_CALLABLE_CHARS, MAX_PARAMETERS, SIGNATURE_LINES};
use crate::types::{CodeElement, ElementKind, ExtractionMode, FileAnalysis, Insights, Result};

static COMPLEX_CONDITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:elif|if)\b[^{:;]*?(?:&&|\|\||\band\b|\bor\b)[^{:;]*?(?:&&|\|\||\band\b|\bor\b)[^{:;]*?(?:&&|\|\||\band\b|\bor\b)",
    )
    .unwrap()
});

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4,}").unwrap());

/// `MAX_SIZE = 4096` and `#define MAX 4096` already name their number
static CONSTANT_DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[\w<>\[\]]+\s+)*?[A-Z][A-Z0-9_]+\s*(?::[^=]*)?=|^\s*#\s*define\s+\w+")
        .unwrap()
});

const COMPLEX_CONDITION_MESSAGE: &str =
    "Complex condition with 3+ logical operators. Consider simplifying.";
const MAGIC_NUMBER_MESSAGE: &str = "Magic number detected. Consider using a named constant.";

/// Pattern-based code smells.
///
/// Produces `{"code_smells": [{"type", "message", "line", "severity"}]}`
/// with types `long_method`, `complex_condition`, `magic_number` and
/// `too_many_arguments`. Callable spans run from a callable's line to the
/// next extracted callable or class, so a long tail of top-level code after
/// the last function counts toward it.
pub struct SmellEnricher;

impl SmellEnricher {
    pub fn detect(analysis: &FileAnalysis, content: &str) -> Vec<Finding> {
        let mut findings = Vec::new();
        let lines: Vec<&str> = content.lines().collect();

        callable_smells(&analysis.elements, &lines, &mut findings);

        for found in COMPLEX_CONDITION.find_iter(content) {
            findings.push(Finding::new(
                "complex_condition",
                COMPLEX_CONDITION_MESSAGE,
                line_at(content, found.start()),
                Severity::Medium,
            ));
        }

        for (row, line) in lines.iter().enumerate() {
            if has_magic_number(line) {
                findings.push(Finding::new(
                    "magic_number",
                    MAGIC_NUMBER_MESSAGE,
                    row as u32 + 1,
                    Severity::Medium,
                ));
            }
        }

        findings.sort_by_key(|f| f.line);
        findings
    }
}

impl Enricher for SmellEnricher {
    fn name(&self) -> &'static str {
        "smells"
    }

    fn enrich(&self, analysis: &FileAnalysis, content: &str) -> Result<Insights> {
        let mut insights = Insights::new();
        // Data and markup files have no callables or conditions to judge
        if matches!(
            analysis.extraction,
            ExtractionMode::Binary | ExtractionMode::Skipped | ExtractionMode::None
        ) {
            return Ok(insights);
        }

        insights.insert(
            "code_smells".to_string(),
            json!(Self::detect(analysis, content)),
        );
        Ok(insights)
    }
}

fn is_callable(kind: ElementKind) -> bool {
    matches!(kind, ElementKind::Function | ElementKind::Method)
}

fn callable_smells(elements: &[CodeElement], lines: &[&str], findings: &mut Vec<Finding>) {
    let boundaries: Vec<u32> = elements
        .iter()
        .filter(|e| is_callable(e.kind()) || matches!(e.kind(), ElementKind::Class | ElementKind::Component))
        .map(|e| e.line())
        .collect();

    for callable in elements.iter().filter(|e| is_callable(e.kind())) {
        let header = callable.line() as usize - 1;
        let end = boundaries
            .iter()
            .find(|line| **line > callable.line())
            .map_or(lines.len(), |line| *line as usize - 1);

        let body: usize = lines
            .get(header + 1..end)
            .unwrap_or_default()
            .iter()
            .map(|line| line.trim().len())
            .sum();
        if body > LONG_CALLABLE_CHARS {
            findings.push(Finding::new(
                "long_method",
                format!(
                    "{} is too long ({} characters). Consider breaking it down.",
                    callable.name(),
                    body
                ),
                callable.line(),
                Severity::Medium,
            ));
        }

        let signature = lines
            .get(header..(header + SIGNATURE_LINES).min(lines.len()))
            .unwrap_or_default()
            .join("\n");
        if let Some(count) = parameter_count(&signature)
            && count > MAX_PARAMETERS
        {
            findings.push(Finding::new(
                "too_many_arguments",
                format!(
                    "Function {} has {} parameters. Consider refactoring.",
                    callable.name(),
                    count
                ),
                callable.line(),
                Severity::Medium,
            ));
        }
    }
}

/// Top-level entries of the first parenthesized list, which must open on
/// the header line.
fn parameter_count(signature: &str) -> Option<usize> {
    let first_line = signature.lines().next()?;
    let open = first_line.find('(')?;

    let mut depth = 0usize;
    let mut count = 0;
    let mut filled = false;
    for ch in signature[open + 1..].chars() {
        match ch {
            ')' if depth == 0 => return Some(count + usize::from(filled)),
            '(' | '[' | '{' | '<' => {
                depth += 1;
                filled = true;
            }
            ')' | ']' | '}' | '>' => {
                depth = depth.saturating_sub(1);
                filled = true;
            }
            ',' if depth == 0 => {
                count += usize::from(filled);
                filled = false;
            }
            c if !c.is_whitespace() => filled = true,
            _ => {}
        }
    }
    None
}

/// A run of 4+ digits standing alone, not part of a name, decimal, negative
/// literal or arithmetic expression.
fn has_magic_number(line: &str) -> bool {
    if CONSTANT_DEFINITION.is_match(line) {
        return false;
    }
    let attached = |c: char| c.is_alphanumeric() || matches!(c, '_' | '.' | '-');
    NUMBER.find_iter(line).any(|found| {
        let rest = &line[found.end()..];
        !line[..found.start()].chars().next_back().is_some_and(attached)
            && !rest.chars().next().is_some_and(attached)
            && !rest.trim_start().starts_with(['/', '*', '+', '-'])
    })
}
