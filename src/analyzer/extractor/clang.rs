use tree_sitter::{Node, Tree};

use super::{
    Extraction, Extractor, element_at, field_text, get_node_text, parse_source, walk_scoped,
};
use crate::types::{CodeElement, ElementKind, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// File level, including `namespace` and `extern "C"` bodies
    Module,
    /// Inside a class, struct or union body
    Class,
    Function,
}

pub struct CExtractor;

impl Extractor for CExtractor {
    fn extract(&self, content: &str) -> Result<Extraction> {
        let tree = parse_source(tree_sitter_c::LANGUAGE, "C", content)?;
        Ok(Extraction::syntax(collect(&tree, content)))
    }

    fn name(&self) -> &'static str {
        "c"
    }
}

pub struct CppExtractor;

impl Extractor for CppExtractor {
    fn extract(&self, content: &str) -> Result<Extraction> {
        let tree = parse_source(tree_sitter_cpp::LANGUAGE, "C++", content)?;
        Ok(Extraction::syntax(collect(&tree, content)))
    }

    fn name(&self) -> &'static str {
        "cpp"
    }
}

/// Node kinds are shared between the two grammars; C is a subset.
fn collect(tree: &Tree, content: &str) -> Vec<CodeElement> {
    let source = content.as_bytes();
    let mut elements = Vec::new();

    walk_scoped(tree.root_node(), Scope::Module, |node, scope| match node.kind() {
        "preproc_include" => {
            if let Some(path) = field_text(node, "path", source) {
                let path = path.trim_matches(|c| c == '"' || c == '<' || c == '>');
                elements.push(element_at(ElementKind::Import, path, node));
            }
            None
        }
        "class_specifier" | "struct_specifier" | "union_specifier" => {
            // Forward declarations and type references have no body
            node.child_by_field_name("body")?;
            if let Some(name) = type_name(node, source) {
                elements.push(element_at(ElementKind::Class, name, node));
            }
            Some(Scope::Class)
        }
        "function_definition" => {
            if let Some(name) = node
                .child_by_field_name("declarator")
                .and_then(declared_name)
            {
                let text = get_node_text(name, source);
                let element = match text.rsplit_once("::") {
                    Some((_, method)) => element_at(ElementKind::Method, method, node),
                    None if scope == Scope::Class => element_at(ElementKind::Method, text, node),
                    None => element_at(ElementKind::Function, text, node),
                };
                elements.push(element);
            }
            Some(Scope::Function)
        }
        "declaration" => {
            if scope == Scope::Module {
                push_variables(node, source, &mut elements);
            }
            Some(scope)
        }
        _ => Some(scope),
    });

    elements
}

/// Tag name, or the alias of an anonymous `typedef struct { .. } Name;`
fn type_name<'a>(node: Node, source: &'a [u8]) -> Option<&'a str> {
    field_text(node, "name", source).or_else(|| {
        let parent = node.parent().filter(|p| p.kind() == "type_definition")?;
        field_text(parent, "declarator", source)
    })
}

/// Identifier introduced by a possibly nested function declarator
fn declared_name(declarator: Node) -> Option<Node> {
    let mut current = declarator;
    loop {
        match current.kind() {
            "identifier" | "field_identifier" | "qualified_identifier" | "destructor_name"
            | "operator_name" => return Some(current),
            "template_function" => current = current.child_by_field_name("name")?,
            _ => current = inner_declarator(current)?,
        }
    }
}

/// `reference_declarator` and `parenthesized_declarator` carry no field name
fn inner_declarator(node: Node) -> Option<Node> {
    node.child_by_field_name("declarator").or_else(|| {
        let mut cursor = node.walk();
        node.named_children(&mut cursor).last()
    })
}

/// Names bound by a file-level declaration; prototypes bind none
fn push_variables(declaration: Node, source: &[u8], elements: &mut Vec<CodeElement>) {
    let mut cursor = declaration.walk();
    for declarator in declaration.children_by_field_name("declarator", &mut cursor) {
        let mut current = declarator;
        let bound = loop {
            match current.kind() {
                "function_declarator" => break None,
                "identifier" => break Some(current),
                _ => match inner_declarator(current) {
                    Some(next) => current = next,
                    None => break None,
                },
            }
        };
        if let Some(name) = bound {
            elements.push(element_at(
                ElementKind::Variable,
                get_node_text(name, source),
                name,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(extractor: &dyn Extractor, source: &str) -> Vec<(ElementKind, String, u32)> {
        extractor
            .extract(source)
            .unwrap()
            .elements
            .into_iter()
            .map(|e| (e.kind(), e.name().to_string(), e.line()))
            .collect()
    }

    #[test]
    fn test_c_translation_unit() {
        let source = r#"#include <stdio.h>
#include "list.h"

static int counter = 0;
int *cursor, total;

struct Node {
    int value;
    struct Node *next;
};

typedef struct {
    double x, y;
} Point;

struct Node;

int add(int a, int b);

static char *name_of(struct Node *node) {
    int local = node->value;
    return "node";
}

int main(void) {
    return 0;
}
"#;
        assert_eq!(
            extract(&CExtractor, source),
            vec![
                (ElementKind::Import, "stdio.h".to_string(), 1),
                (ElementKind::Import, "list.h".to_string(), 2),
                (ElementKind::Variable, "counter".to_string(), 4),
                (ElementKind::Variable, "cursor".to_string(), 5),
                (ElementKind::Variable, "total".to_string(), 5),
                (ElementKind::Class, "Node".to_string(), 7),
                (ElementKind::Class, "Point".to_string(), 12),
                (ElementKind::Function, "name_of".to_string(), 20),
                (ElementKind::Function, "main".to_string(), 25),
            ]
        );
    }

    #[test]
    fn test_cpp_namespaces_classes_and_templates() {
        let source = r#"#include <string>
#include "box.h"

namespace util {
int add(int a, int b) {
    return a + b;
}

const int limit = 10;

class Box {
public:
    Box() {}
    void open();
    int size() const {
        return count;
    }
private:
    int count;
};
}

void util::Box::open() {
    int local = 1;
}

extern "C" {
int exported(int x) {
    return x;
}
}

template <typename T>
T identity(T value) {
    return value;
}
"#;
        assert_eq!(
            extract(&CppExtractor, source),
            vec![
                (ElementKind::Import, "string".to_string(), 1),
                (ElementKind::Import, "box.h".to_string(), 2),
                (ElementKind::Function, "add".to_string(), 5),
                (ElementKind::Variable, "limit".to_string(), 9),
                (ElementKind::Class, "Box".to_string(), 11),
                (ElementKind::Method, "Box".to_string(), 13),
                (ElementKind::Method, "size".to_string(), 15),
                (ElementKind::Method, "open".to_string(), 23),
                (ElementKind::Function, "exported".to_string(), 28),
                (ElementKind::Function, "identity".to_string(), 34),
            ]
        );
    }

    #[test]
    fn test_parse_failure() {
        assert!(CExtractor.extract("int main( {\n").is_err());
        assert!(CppExtractor.extract("class Box {\n").is_err());
    }
}
