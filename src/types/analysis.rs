//! Per-file analysis record

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::element::{CodeElement, ElementKind};

/// Free-form enrichment output, keyed by insight name
pub type Insights = BTreeMap<String, serde_json::Value>;

/// How the elements of a record were obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Parse-tree extraction
    Syntax,
    /// Line-oriented patterns; the language has no parse-tree extractor
    Heuristic,
    /// Parse tree failed and the heuristic result was substituted
    Degraded,
    /// No extractor for the language
    #[default]
    None,
    /// Content is not text
    Binary,
    /// Analysis budget exceeded or file unreadable
    Skipped,
}

impl ExtractionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Syntax => "syntax",
            Self::Heuristic => "heuristic",
            Self::Degraded => "degraded",
            Self::None => "none",
            Self::Binary => "binary",
            Self::Skipped => "skipped",
        }
    }

    pub fn is_approximate(&self) -> bool {
        matches!(self, Self::Heuristic | Self::Degraded)
    }
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural and metric profile of one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAnalysis {
    pub path: String,
    pub language: String,
    pub size: u64,
    pub line_count: u64,
    pub comment_count: u64,
    pub comment_ratio: f64,
    pub extraction: ExtractionMode,
    pub elements: Vec<CodeElement>,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub content: String,
    #[serde(flatten, deserialize_with = "non_empty_insights")]
    pub insights: Option<Insights>,
}

/// A record without insight keys reads back as `None`
fn non_empty_insights<'de, D>(deserializer: D) -> Result<Option<Insights>, D::Error>
where
    D: Deserializer<'de>,
{
    let insights = Insights::deserialize(deserializer)?;
    Ok((!insights.is_empty()).then_some(insights))
}

impl FileAnalysis {
    /// Field names an insight key may never shadow in the serialized record
    pub const RESERVED_KEYS: &'static [&'static str] = &[
        "path",
        "language",
        "size",
        "line_count",
        "comment_count",
        "comment_ratio",
        "extraction",
        "elements",
        "summary",
        "warnings",
        "content",
    ];

    /// Record with no elements and no metrics, used for binary, unreadable
    /// and timed-out files.
    pub fn empty(
        path: impl Into<String>,
        language: impl Into<String>,
        size: u64,
        extraction: ExtractionMode,
    ) -> Self {
        Self {
            path: path.into(),
            language: language.into(),
            size,
            line_count: 0,
            comment_count: 0,
            comment_ratio: 0.0,
            extraction,
            elements: Vec::new(),
            summary: String::new(),
            warnings: Vec::new(),
            content: String::new(),
            insights: None,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn count(&self, kind: ElementKind) -> usize {
        self.elements.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn elements_of(&self, kind: ElementKind) -> impl Iterator<Item = &CodeElement> {
        self.elements.iter().filter(move |e| e.kind() == kind)
    }

    /// Merge enrichment output into `insights`.
    ///
    /// Keys naming a core field are dropped with a warning; later values
    /// replace earlier ones for the same insight key. Returns the number of
    /// keys merged.
    pub fn merge_insights(&mut self, source: &str, insights: Insights) -> usize {
        let mut merged = 0;
        for (key, value) in insights {
            if Self::RESERVED_KEYS.contains(&key.as_str()) {
                tracing::debug!("{}: dropping reserved insight key '{}'", self.path, key);
                self.warnings.push(format!(
                    "insight key '{}' from {} collides with a core field and was dropped",
                    key, source
                ));
                continue;
            }
            self.insights
                .get_or_insert_with(BTreeMap::new)
                .insert(key, value);
            merged += 1;
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> FileAnalysis {
        FileAnalysis::empty("a.py", "Python", 10, ExtractionMode::Syntax)
    }

    #[test]
    fn test_approximate_modes() {
        assert!(ExtractionMode::Heuristic.is_approximate());
        assert!(ExtractionMode::Degraded.is_approximate());
        assert!(!ExtractionMode::Syntax.is_approximate());
        assert!(!ExtractionMode::Binary.is_approximate());
    }

    #[test]
    fn test_merge_insights_drops_reserved_keys() {
        let mut analysis = record();
        let mut insights = Insights::new();
        insights.insert("path".to_string(), json!("evil"));
        insights.insert("ai_insights".to_string(), json!({"quality": "good"}));

        let merged = analysis.merge_insights("test", insights);

        assert_eq!(merged, 1);
        assert_eq!(analysis.path, "a.py");
        assert_eq!(analysis.warnings.len(), 1);
        assert!(analysis.warnings[0].contains("'path'"));
        let stored = analysis.insights.as_ref().unwrap();
        assert_eq!(stored["ai_insights"], json!({"quality": "good"}));
    }

    #[test]
    fn test_insights_absent_by_default_and_flattened_when_present() {
        let mut analysis = record();
        let json = serde_json::to_value(&analysis).unwrap();
        assert!(json.get("insights").is_none());
        assert!(json.get("warnings").is_none());

        let mut insights = Insights::new();
        insights.insert("complexity".to_string(), json!({"rating": "low"}));
        analysis.merge_insights("test", insights);

        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["complexity"]["rating"], "low");
        assert_eq!(json["path"], "a.py");
        assert_eq!(json["extraction"], "syntax");
    }

    #[test]
    fn test_roundtrip_keeps_insights() {
        let mut analysis = record();
        let mut insights = Insights::new();
        insights.insert("custom".to_string(), json!(1));
        analysis.merge_insights("test", insights);

        let text = serde_json::to_string(&analysis).unwrap();
        let back: FileAnalysis = serde_json::from_str(&text).unwrap();
        assert_eq!(back, analysis);
    }

    #[test]
    fn test_roundtrip_without_insights_stays_none() {
        let analysis = record().with_warning("Parse error in a.py");
        let text = serde_json::to_string(&analysis).unwrap();
        let back: FileAnalysis = serde_json::from_str(&text).unwrap();
        assert_eq!(back.insights, None);
        assert_eq!(back, analysis);
    }
}
