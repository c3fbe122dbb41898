use std::sync::LazyLock;

use regex::Regex;
use tree_sitter::Node;

use super::{
    Extraction, Extractor, element_at, field_text, get_node_text, parse_source, unquote,
    walk_scoped,
};
use crate::types::{CodeElement, ElementKind, Result};

static COMPONENT_HERITAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^extends\s+(?:React\s*\.\s*)?(?:Pure)?Component\b").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Program,
    Class,
    Function,
}

/// Which grammar a file is parsed with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `.ts`: angle-bracket casts are not JSX
    TypeScript,
    /// `.js`, `.jsx`, `.tsx`: JSX enabled
    Tsx,
}

pub struct TypeScriptExtractor {
    dialect: Dialect,
}

impl TypeScriptExtractor {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    fn parse(&self, content: &str) -> Result<tree_sitter::Tree> {
        match self.dialect {
            Dialect::TypeScript => parse_source(
                tree_sitter_typescript::LANGUAGE_TYPESCRIPT,
                "TypeScript",
                content,
            ),
            Dialect::Tsx => parse_source(tree_sitter_typescript::LANGUAGE_TSX, "TSX", content),
        }
    }
}

impl Extractor for TypeScriptExtractor {
    fn extract(&self, content: &str) -> Result<Extraction> {
        let tree = self.parse(content)?;
        let source = content.as_bytes();
        let mut elements = Vec::new();

        walk_scoped(tree.root_node(), Scope::Program, |node, scope| match node.kind() {
            "import_statement" => {
                if let Some(module) = field_text(node, "source", source) {
                    elements.push(element_at(ElementKind::Import, unquote(module), node));
                }
                None
            }
            "call_expression" => {
                if let Some(module) = required_module(node, source) {
                    elements.push(element_at(ElementKind::Import, module, node));
                }
                Some(scope)
            }
            "class_declaration" | "abstract_class_declaration" | "class" => {
                if let Some(name) = field_text(node, "name", source) {
                    let kind = if extends_component(node, source) {
                        ElementKind::Component
                    } else {
                        ElementKind::Class
                    };
                    elements.push(element_at(kind, name, node));
                }
                Some(Scope::Class)
            }
            "interface_declaration" => {
                if let Some(name) = field_text(node, "name", source) {
                    elements.push(element_at(ElementKind::Class, name, node));
                }
                None
            }
            "function_declaration" | "generator_function_declaration" => {
                if let Some(name) = field_text(node, "name", source) {
                    elements.push(element_at(ElementKind::Function, name, node));
                }
                Some(Scope::Function)
            }
            "method_definition" => {
                if let Some(name) = field_text(node, "name", source) {
                    let kind = if scope == Scope::Class {
                        ElementKind::Method
                    } else {
                        ElementKind::Function
                    };
                    elements.push(element_at(kind, name, node));
                }
                Some(Scope::Function)
            }
            "variable_declarator" => Some(extract_declarator(node, scope, source, &mut elements)),
            "pair" => {
                if let Some(value) = node.child_by_field_name("value")
                    && is_function_value(value)
                    && let Some(key) = field_text(node, "key", source)
                {
                    elements.push(element_at(ElementKind::Function, unquote(key), node));
                    return Some(Scope::Function);
                }
                Some(scope)
            }
            _ => Some(scope),
        });

        Ok(Extraction::syntax(elements))
    }

    fn name(&self) -> &'static str {
        match self.dialect {
            Dialect::TypeScript => "typescript",
            Dialect::Tsx => "tsx",
        }
    }
}

/// Classify `const X = ...` and return the scope for its children.
fn extract_declarator(
    node: Node,
    scope: Scope,
    source: &[u8],
    elements: &mut Vec<CodeElement>,
) -> Scope {
    let Some(name_node) = node.child_by_field_name("name") else {
        return scope;
    };
    if name_node.kind() != "identifier" {
        return scope;
    }
    let name = get_node_text(name_node, source);
    let value = node.child_by_field_name("value");

    if let Some(value) = value {
        if is_function_value(value) {
            let kind = if is_pascal_case(name) {
                ElementKind::Component
            } else {
                ElementKind::Function
            };
            elements.push(element_at(kind, name, node));
            return Scope::Function;
        }
        // `const x = require("y")` is reported as the import only
        if value.kind() == "call_expression" && required_module(value, source).is_some() {
            return scope;
        }
    }

    if is_top_level_declarator(node) {
        elements.push(element_at(ElementKind::Variable, name, node));
    }
    scope
}

fn is_function_value(value: Node) -> bool {
    matches!(
        value.kind(),
        "arrow_function" | "function_expression" | "function" | "generator_function"
    )
}

fn is_pascal_case(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.any(|c| c.is_ascii_lowercase())
}

/// Declarator whose declaration sits directly in the program (optionally exported)
fn is_top_level_declarator(declarator: Node) -> bool {
    let Some(declaration) = declarator.parent() else {
        return false;
    };
    if !matches!(declaration.kind(), "lexical_declaration" | "variable_declaration") {
        return false;
    }
    match declaration.parent() {
        Some(parent) if parent.kind() == "program" => true,
        Some(parent) if parent.kind() == "export_statement" => {
            super::parent_kind_is(parent, "program")
        }
        _ => false,
    }
}

/// Module named by `require("x")` or dynamic `import("x")`
fn required_module<'a>(call: Node, source: &'a [u8]) -> Option<&'a str> {
    let function = call.child_by_field_name("function")?;
    let callee = function.kind();
    let is_require = callee == "identifier" && get_node_text(function, source) == "require";
    if !is_require && callee != "import" {
        return None;
    }
    let arguments = call.child_by_field_name("arguments")?;
    let first = arguments.named_child(0)?;
    if !matches!(first.kind(), "string" | "template_string") {
        return None;
    }
    Some(unquote(get_node_text(first, source)))
}

fn extends_component(class: Node, source: &[u8]) -> bool {
    let mut cursor = class.walk();
    class
        .children(&mut cursor)
        .filter(|child| child.kind() == "class_heritage")
        .any(|heritage| COMPONENT_HERITAGE.is_match(get_node_text(heritage, source).trim()))
}
