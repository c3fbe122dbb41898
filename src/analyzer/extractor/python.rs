use tree_sitter::Node;

use super::{Extraction, Extractor, element_at, field_text, get_node_text, parse_source, walk_scoped};
use crate::types::{CodeElement, ElementKind, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Module,
    Class,
    Function,
}

pub struct PythonExtractor;

impl Extractor for PythonExtractor {
    fn extract(&self, content: &str) -> Result<Extraction> {
        let tree = parse_source(tree_sitter_python::LANGUAGE, "Python", content)?;
        let source = content.as_bytes();
        let mut elements = Vec::new();

        walk_scoped(tree.root_node(), Scope::Module, |node, scope| match node.kind() {
            "import_statement" => {
                extract_import(node, source, &mut elements);
                None
            }
            "import_from_statement" | "future_import_statement" => {
                extract_from_import(node, source, &mut elements);
                None
            }
            "class_definition" => {
                if let Some(name) = field_text(node, "name", source) {
                    elements.push(element_at(ElementKind::Class, name, node));
                }
                Some(Scope::Class)
            }
            "function_definition" => {
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
            "expression_statement" if super::parent_kind_is(node, "module") => {
                extract_assignment(node, source, &mut elements);
                None
            }
            _ => Some(scope),
        });

        Ok(Extraction::syntax(elements))
    }

    fn name(&self) -> &'static str {
        "python"
    }
}

/// `import a.b, c as d` yields one element per imported module
fn extract_import(node: Node, source: &[u8], elements: &mut Vec<CodeElement>) {
    let mut cursor = node.walk();
    for name in node.children_by_field_name("name", &mut cursor) {
        elements.push(element_at(ElementKind::Import, module_name(name, source), node));
    }
}

/// `from m import a, b` yields "from m import a" and "from m import b"
fn extract_from_import(node: Node, source: &[u8], elements: &mut Vec<CodeElement>) {
    let module = if node.kind() == "future_import_statement" {
        "__future__"
    } else {
        field_text(node, "module_name", source).unwrap_or("")
    };

    let mut cursor = node.walk();
    let names: Vec<String> = node
        .children_by_field_name("name", &mut cursor)
        .map(|name| module_name(name, source).to_string())
        .collect();

    if names.is_empty() {
        let mut cursor = node.walk();
        if node
            .children(&mut cursor)
            .any(|child| child.kind() == "wildcard_import")
        {
            elements.push(element_at(
                ElementKind::Import,
                format!("from {} import *", module),
                node,
            ));
        }
        return;
    }

    for name in names {
        elements.push(element_at(
            ElementKind::Import,
            format!("from {} import {}", module, name),
            node,
        ));
    }
}

/// Imported name without its alias
fn module_name<'a>(node: Node, source: &'a [u8]) -> &'a str {
    if node.kind() == "aliased_import" {
        return field_text(node, "name", source).unwrap_or("");
    }
    get_node_text(node, source)
}

/// Module-level `name = value` (chained targets report the first name)
fn extract_assignment(statement: Node, source: &[u8], elements: &mut Vec<CodeElement>) {
    let Some(assignment) = statement.named_child(0) else {
        return;
    };
    if assignment.kind() != "assignment" || assignment.child_by_field_name("right").is_none() {
        return;
    }
    if let Some(left) = assignment.child_by_field_name("left")
        && left.kind() == "identifier"
    {
        elements.push(element_at(
            ElementKind::Variable,
            get_node_text(left, source),
            statement,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExtractionMode;

    fn extract(source: &str) -> Vec<(ElementKind, String, u32)> {
        PythonExtractor
            .extract(source)
            .unwrap()
            .elements
            .into_iter()
            .map(|e| (e.kind(), e.name().to_string(), e.line()))
            .collect()
    }

    #[test]
    fn test_single_function() {
        let result = PythonExtractor.extract("def foo():\n    pass\n").unwrap();
        assert_eq!(result.mode, ExtractionMode::Syntax);
        assert_eq!(
            extract("def foo():\n    pass\n"),
            vec![(ElementKind::Function, "foo".to_string(), 1)]
        );
    }

    #[test]
    fn test_imports() {
        let source = "import os, sys as system\nfrom a.b import c, d as e\nfrom . import x\nfrom m import *\nfrom __future__ import annotations\n";
        let names: Vec<_> = extract(source).into_iter().map(|(_, n, _)| n).collect();
        assert_eq!(
            names,
            [
                "os",
                "sys",
                "from a.b import c",
                "from a.b import d",
                "from . import x",
                "from m import *",
                "from __future__ import annotations",
            ]
        );
    }

    #[test]
    fn test_methods_nested_in_class() {
        let source = r#"
class Greeter(Base):
    """Says hello."""

    def __init__(self, name):
        self.name = name

    @property
    def greeting(self):
        def inner():
            return "hi"
        return inner()

def helper():
    pass
"#;
        assert_eq!(
            extract(source),
            vec![
                (ElementKind::Class, "Greeter".to_string(), 2),
                (ElementKind::Method, "__init__".to_string(), 5),
                (ElementKind::Method, "greeting".to_string(), 9),
                (ElementKind::Function, "inner".to_string(), 10),
                (ElementKind::Function, "helper".to_string(), 14),
            ]
        );
    }

    #[test]
    fn test_only_module_level_assignments_are_variables() {
        let source = "VERSION = '1.0'\nDEBUG: bool = False\n\ndef f():\n    local = 1\n\nif True:\n    hidden = 2\nx == 3\n";
        let vars: Vec<_> = extract(source)
            .into_iter()
            .filter(|(k, _, _)| *k == ElementKind::Variable)
            .map(|(_, n, l)| (n, l))
            .collect();
        assert_eq!(
            vars,
            [("VERSION".to_string(), 1), ("DEBUG".to_string(), 2)]
        );
    }

    #[test]
    fn test_async_functions_and_decorators() {
        let source = "@app.route('/')\nasync def index():\n    return 1\n";
        let elements = extract(source);
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].0, ElementKind::Function);
        assert_eq!(elements[0].1, "index");
    }

    #[test]
    fn test_syntax_error_is_parse_failure() {
        assert!(PythonExtractor.extract("class :\n  def (\n").is_err());
    }

    #[test]
    fn test_names_in_strings_are_ignored() {
        let source = "TEMPLATE = \"\"\"\ndef not_a_function():\n    pass\n\"\"\"\n";
        let elements = extract(source);
        assert_eq!(elements, vec![(ElementKind::Variable, "TEMPLATE".to_string(), 1)]);
    }
}
