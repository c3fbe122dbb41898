use tree_sitter::{Node, Tree};

use crate::types::{CodeElement, ElementKind, ExtractionMode, Result, ScopeError};

/// Elements found in one file and how they were found
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Extraction {
    pub elements: Vec<CodeElement>,
    pub mode: ExtractionMode,
}

impl Extraction {
    /// Sorts elements by line; equal lines keep discovery order.
    pub fn new(mode: ExtractionMode, mut elements: Vec<CodeElement>) -> Self {
        elements.sort_by_key(|e| e.line());
        Self { elements, mode }
    }

    pub fn syntax(elements: Vec<CodeElement>) -> Self {
        Self::new(ExtractionMode::Syntax, elements)
    }

    pub fn heuristic(elements: Vec<CodeElement>) -> Self {
        Self::new(ExtractionMode::Heuristic, elements)
    }

    pub fn none() -> Self {
        Self::new(ExtractionMode::None, Vec::new())
    }
}

/// A per-language structural extraction strategy.
///
/// Implementations hold no per-file state and may be shared across threads.
pub trait Extractor: Send + Sync {
    fn extract(&self, content: &str) -> Result<Extraction>;
    fn name(&self) -> &'static str;
}

/// Create a tree-sitter parser for the given language.
pub fn create_ts_parser<L: Into<tree_sitter::Language>>(
    language: L,
    lang_name: &str,
) -> Result<tree_sitter::Parser> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&language.into())
        .map_err(|e| ScopeError::parse("", format!("Failed to set {} language: {}", lang_name, e)))?;
    Ok(parser)
}

/// Parse `content` and reject trees that contain ERROR or MISSING nodes.
pub fn parse_source<L: Into<tree_sitter::Language>>(
    language: L,
    lang_name: &str,
    content: &str,
) -> Result<Tree> {
    let mut parser = create_ts_parser(language, lang_name)?;
    let tree = parser
        .parse(content, None)
        .ok_or_else(|| ScopeError::parse("", format!("Failed to parse {} source", lang_name)))?;

    let root = tree.root_node();
    if root.has_error() {
        let line = first_error_line(root).unwrap_or(1);
        return Err(ScopeError::parse(
            "",
            format!("{} syntax tree contains errors near line {}", lang_name, line),
        ));
    }
    Ok(tree)
}

/// 1-based line of the first ERROR or MISSING node in document order
fn first_error_line(root: Node) -> Option<usize> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node.start_position().row + 1);
        }
        if !node.has_error() {
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    None
}

/// Pre-order walk carrying a scope value down the tree.
///
/// `visit` returns the scope for the node's children, or `None` to skip
/// them. Uses an explicit stack so deeply nested sources cannot overflow.
pub fn walk_scoped<'t, S: Copy>(
    root: Node<'t>,
    initial: S,
    mut visit: impl FnMut(Node<'t>, S) -> Option<S>,
) {
    let mut stack = vec![(root, initial)];
    while let Some((node, scope)) = stack.pop() {
        let Some(child_scope) = visit(node, scope) else {
            continue;
        };
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev().map(|child| (child, child_scope)));
    }
}

/// Extract text content from a tree-sitter node.
/// Returns empty string if extraction fails (with debug logging).
#[inline]
pub fn get_node_text<'a>(node: Node, content: &'a [u8]) -> &'a str {
    node.utf8_text(content).unwrap_or_else(|e| {
        tracing::debug!(
            "UTF-8 extraction failed at {}:{}: {}",
            node.start_position().row + 1,
            node.start_position().column,
            e
        );
        ""
    })
}

/// Text of the named field, if present and non-empty
pub fn field_text<'a>(node: Node, field: &str, content: &'a [u8]) -> Option<&'a str> {
    node.child_by_field_name(field)
        .map(|n| get_node_text(n, content))
        .filter(|text| !text.is_empty())
}

/// Element located at the node's start row
#[inline]
pub fn element_at(kind: ElementKind, name: impl Into<String>, node: Node) -> CodeElement {
    CodeElement::at_row(kind, name, node.start_position().row)
}

/// Strip one layer of matching quotes from a string literal
pub fn unquote(literal: &str) -> &str {
    let trimmed = literal.trim();
    for quote in ['"', '\'', '`'] {
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    trimmed
}

pub fn parent_kind_is(node: Node, kind: &str) -> bool {
    node.parent().is_some_and(|p| p.kind() == kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_sorts_stably_by_line() {
        let extraction = Extraction::heuristic(vec![
            CodeElement::new(ElementKind::Function, "late", 9),
            CodeElement::new(ElementKind::Import, "a", 1),
            CodeElement::new(ElementKind::Import, "b", 1),
        ]);
        let names: Vec<_> = extraction.elements.iter().map(|e| e.name()).collect();
        assert_eq!(names, ["a", "b", "late"]);
        assert_eq!(extraction.mode, ExtractionMode::Heuristic);
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"fmt\""), "fmt");
        assert_eq!(unquote("'react'"), "react");
        assert_eq!(unquote("`raw`"), "raw");
        assert_eq!(unquote("bare"), "bare");
    }

    #[test]
    fn test_parse_source_rejects_error_trees() {
        let err = parse_source(tree_sitter_python::LANGUAGE, "Python", "def broken(:\n")
            .unwrap_err();
        assert!(matches!(err, ScopeError::Parse { .. }));
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_parse_source_accepts_valid_trees() {
        let tree = parse_source(tree_sitter_python::LANGUAGE, "Python", "x = 1\n").unwrap();
        assert_eq!(tree.root_node().kind(), "module");
    }

    #[test]
    fn test_walk_scoped_visits_in_document_order() {
        let tree = parse_source(tree_sitter_python::LANGUAGE, "Python", "a = 1\nb = 2\n").unwrap();
        let source = b"a = 1\nb = 2\n";
        let mut seen = Vec::new();
        walk_scoped(tree.root_node(), 0u8, |node, depth| {
            if node.kind() == "identifier" {
                seen.push(get_node_text(node, source).to_string());
            }
            Some(depth + 1)
        });
        assert_eq!(seen, ["a", "b"]);
    }
}
