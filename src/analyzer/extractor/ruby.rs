use tree_sitter::Node;

use super::{
    Extraction, Extractor, element_at, field_text, get_node_text, parent_kind_is, parse_source,
    walk_scoped,
};
use crate::types::{ElementKind, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Program,
    /// Inside a `class`, `module` or `class << self` body
    Class,
    Method,
}

pub struct RubyExtractor;

impl Extractor for RubyExtractor {
    fn extract(&self, content: &str) -> Result<Extraction> {
        let tree = parse_source(tree_sitter_ruby::LANGUAGE, "Ruby", content)?;
        let source = content.as_bytes();
        let mut elements = Vec::new();

        walk_scoped(tree.root_node(), Scope::Program, |node, scope| match node.kind() {
            "call" => {
                if node.child_by_field_name("receiver").is_none()
                    && field_text(node, "method", source)
                        .is_some_and(|m| matches!(m, "require" | "require_relative" | "load"))
                    && let Some(path) = required_path(node, source)
                {
                    elements.push(element_at(ElementKind::Import, path, node));
                }
                Some(scope)
            }
            "class" | "module" => {
                if let Some(name) = field_text(node, "name", source) {
                    elements.push(element_at(ElementKind::Class, name, node));
                }
                Some(Scope::Class)
            }
            "singleton_class" => Some(Scope::Class),
            "method" => {
                if let Some(name) = field_text(node, "name", source) {
                    let kind = if scope == Scope::Class {
                        ElementKind::Method
                    } else {
                        ElementKind::Function
                    };
                    elements.push(element_at(kind, name, node));
                }
                Some(Scope::Method)
            }
            "singleton_method" => {
                if let Some(name) = field_text(node, "name", source) {
                    elements.push(element_at(ElementKind::Method, name, node));
                }
                Some(Scope::Method)
            }
            "assignment" => {
                if parent_kind_is(node, "program")
                    && let Some(left) = node.child_by_field_name("left")
                    && matches!(left.kind(), "identifier" | "constant")
                {
                    elements.push(element_at(
                        ElementKind::Variable,
                        get_node_text(left, source),
                        node,
                    ));
                }
                Some(scope)
            }
            _ => Some(scope),
        });

        Ok(Extraction::syntax(elements))
    }

    fn name(&self) -> &'static str {
        "ruby"
    }
}

/// Literal path of `require "x"`; interpolated or computed paths are skipped
fn required_path<'a>(call: Node, source: &'a [u8]) -> Option<&'a str> {
    let arguments = call.child_by_field_name("arguments")?;
    let mut cursor = arguments.walk();
    let literal = arguments
        .named_children(&mut cursor)
        .find(|n| n.kind() == "string")?;
    let mut cursor = literal.walk();
    let mut parts = literal.named_children(&mut cursor);
    let content = parts.next().filter(|n| n.kind() == "string_content")?;
    parts
        .next()
        .is_none()
        .then(|| get_node_text(content, source))
}
