use super::{Extraction, Extractor, element_at, field_text, parse_source, walk_scoped};
use crate::types::{ElementKind, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Module,
    /// Inside an `impl` or `trait` body
    Impl,
    Function,
}

pub struct RustExtractor;

impl Extractor for RustExtractor {
    fn extract(&self, content: &str) -> Result<Extraction> {
        let tree = parse_source(tree_sitter_rust::LANGUAGE, "Rust", content)?;
        let source = content.as_bytes();
        let mut elements = Vec::new();

        walk_scoped(tree.root_node(), Scope::Module, |node, scope| match node.kind() {
            "use_declaration" => {
                if let Some(path) = field_text(node, "argument", source) {
                    let path: String = path.split_whitespace().collect();
                    elements.push(element_at(ElementKind::Import, path, node));
                }
                None
            }
            "extern_crate_declaration" => {
                if let Some(name) = field_text(node, "name", source) {
                    elements.push(element_at(ElementKind::Import, name, node));
                }
                None
            }
            "struct_item" | "enum_item" | "union_item" => {
                if let Some(name) = field_text(node, "name", source) {
                    elements.push(element_at(ElementKind::Class, name, node));
                }
                None
            }
            "trait_item" => {
                if let Some(name) = field_text(node, "name", source) {
                    elements.push(element_at(ElementKind::Class, name, node));
                }
                Some(Scope::Impl)
            }
            "impl_item" => Some(Scope::Impl),
            "function_item" => {
                if let Some(name) = field_text(node, "name", source) {
                    let kind = if scope == Scope::Impl {
                        ElementKind::Method
                    } else {
                        ElementKind::Function
                    };
                    elements.push(element_at(kind, name, node));
                }
                Some(Scope::Function)
            }
            "function_signature_item" => {
                if scope == Scope::Impl
                    && let Some(name) = field_text(node, "name", source)
                {
                    elements.push(element_at(ElementKind::Method, name, node));
                }
                None
            }
            "const_item" | "static_item" => {
                if super::parent_kind_is(node, "source_file")
                    && let Some(name) = field_text(node, "name", source)
                {
                    elements.push(element_at(ElementKind::Variable, name, node));
                }
                None
            }
            _ => Some(scope),
        });

        Ok(Extraction::syntax(elements))
    }

    fn name(&self) -> &'static str {
        "rust"
    }
}
