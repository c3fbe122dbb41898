use tree_sitter::Node;

use super::{Extraction, Extractor, element_at, field_text, get_node_text, parse_source, walk_scoped};
use crate::types::{ElementKind, Result};

pub struct JavaExtractor;

impl Extractor for JavaExtractor {
    fn extract(&self, content: &str) -> Result<Extraction> {
        let tree = parse_source(tree_sitter_java::LANGUAGE, "Java", content)?;
        let source = content.as_bytes();
        let mut elements = Vec::new();

        walk_scoped(tree.root_node(), (), |node, ()| match node.kind() {
            "import_declaration" => {
                let name = import_target(node, source);
                if !name.is_empty() {
                    elements.push(element_at(ElementKind::Import, name, node));
                }
                None
            }
            "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "record_declaration"
            | "annotation_type_declaration" => {
                if let Some(name) = field_text(node, "name", source) {
                    elements.push(element_at(ElementKind::Class, name, node));
                }
                Some(())
            }
            // Java has no free functions
            "method_declaration" | "constructor_declaration" | "compact_constructor_declaration" => {
                if let Some(name) = field_text(node, "name", source) {
                    elements.push(element_at(ElementKind::Method, name, node));
                }
                Some(())
            }
            _ => Some(()),
        });

        Ok(Extraction::syntax(elements))
    }

    fn name(&self) -> &'static str {
        "java"
    }
}

/// `import static a.b.C.*;` -> `a.b.C.*`
fn import_target(node: Node, source: &[u8]) -> String {
    let text = get_node_text(node, source);
    let body = text
        .trim()
        .trim_start_matches("import")
        .trim_end_matches(';')
        .trim();
    let body = body.strip_prefix("static").map_or(body, str::trim_start);
    body.split_whitespace().collect()
}
