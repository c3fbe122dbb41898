use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of structural element found in a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Import,
    Class,
    Function,
    Method,
    Variable,
    Component,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::Class => "class",
            Self::Function => "function",
            Self::Method => "method",
            Self::Variable => "variable",
            Self::Component => "component",
        }
    }

    /// Functions and methods both count as callables in project rollups
    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Function | Self::Method)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, typed, line-located unit of code structure.
///
/// Fields are private so a produced element cannot be altered afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodeElement {
    #[serde(rename = "type")]
    kind: ElementKind,
    name: String,
    line: u32,
}

impl CodeElement {
    /// Lines are 1-based; a zero line is clamped to 1.
    pub fn new(kind: ElementKind, name: impl Into<String>, line: u32) -> Self {
        Self {
            kind,
            name: name.into(),
            line: line.max(1),
        }
    }

    /// Build from a 0-based row as reported by parsers and line iterators
    pub fn at_row(kind: ElementKind, name: impl Into<String>, row: usize) -> Self {
        let line = u32::try_from(row.saturating_add(1)).unwrap_or(u32::MAX);
        Self::new(kind, name, line)
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for CodeElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} @{}", self.kind, self.name, self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_is_one_based() {
        assert_eq!(CodeElement::new(ElementKind::Class, "A", 0).line(), 1);
        assert_eq!(CodeElement::at_row(ElementKind::Class, "A", 0).line(), 1);
        assert_eq!(CodeElement::at_row(ElementKind::Class, "A", 9).line(), 10);
    }

    #[test]
    fn test_serializes_kind_as_type() {
        let element = CodeElement::new(ElementKind::Method, "run", 3);
        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "method", "name": "run", "line": 3})
        );
    }

    #[test]
    fn test_callable_kinds() {
        assert!(ElementKind::Function.is_callable());
        assert!(ElementKind::Method.is_callable());
        assert!(!ElementKind::Component.is_callable());
        assert!(!ElementKind::Class.is_callable());
    }

    #[test]
    fn test_display() {
        let element = CodeElement::new(ElementKind::Import, "os", 1);
        assert_eq!(element.to_string(), "import os @1");
    }
}
