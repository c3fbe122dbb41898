use tree_sitter::Node;

use super::{
    Extraction, Extractor, element_at, field_text, get_node_text, parse_source, unquote,
    walk_scoped,
};
use crate::types::{CodeElement, ElementKind, Result};

pub struct GoExtractor;

impl Extractor for GoExtractor {
    fn extract(&self, content: &str) -> Result<Extraction> {
        let tree = parse_source(tree_sitter_go::LANGUAGE, "Go", content)?;
        let source = content.as_bytes();
        let mut elements = Vec::new();

        walk_scoped(tree.root_node(), (), |node, ()| match node.kind() {
            "import_spec" => {
                if let Some(path) = field_text(node, "path", source) {
                    elements.push(element_at(ElementKind::Import, unquote(path), node));
                }
                None
            }
            // Only struct and interface types count as classes
            "type_spec" => {
                let is_class = node
                    .child_by_field_name("type")
                    .is_some_and(|t| matches!(t.kind(), "struct_type" | "interface_type"));
                if is_class && let Some(name) = field_text(node, "name", source) {
                    elements.push(element_at(ElementKind::Class, name, node));
                }
                None
            }
            "function_declaration" => {
                if let Some(name) = field_text(node, "name", source) {
                    elements.push(element_at(ElementKind::Function, name, node));
                }
                Some(())
            }
            "method_declaration" => {
                if let Some(name) = field_text(node, "name", source) {
                    elements.push(element_at(ElementKind::Method, name, node));
                }
                Some(())
            }
            "var_declaration" | "const_declaration" => {
                if super::parent_kind_is(node, "source_file") {
                    extract_package_vars(node, source, &mut elements);
                }
                None
            }
            _ => Some(()),
        });

        Ok(Extraction::syntax(elements))
    }

    fn name(&self) -> &'static str {
        "go"
    }
}

/// Every name bound by a package-level `var` or `const` block
fn extract_package_vars(declaration: Node, source: &[u8], elements: &mut Vec<CodeElement>) {
    walk_scoped(declaration, (), |node, ()| {
        if !matches!(node.kind(), "var_spec" | "const_spec") {
            return Some(());
        }
        let mut cursor = node.walk();
        for name in node.children_by_field_name("name", &mut cursor) {
            let text = get_node_text(name, source);
            if !text.is_empty() && text != "_" {
                elements.push(element_at(ElementKind::Variable, text, name));
            }
        }
        None
    });
}
