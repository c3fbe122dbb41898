use tree_sitter::Node;

use super::{
    Extraction, Extractor, element_at, field_text, parent_kind_is, parse_source, unquote,
    walk_scoped,
};
use crate::types::{ElementKind, Result};

pub struct BashExtractor;

impl Extractor for BashExtractor {
    fn extract(&self, content: &str) -> Result<Extraction> {
        let tree = parse_source(tree_sitter_bash::LANGUAGE, "Bash", content)?;
        let source = content.as_bytes();
        let mut elements = Vec::new();

        walk_scoped(tree.root_node(), (), |node, ()| match node.kind() {
            "function_definition" => {
                if let Some(name) = field_text(node, "name", source) {
                    elements.push(element_at(ElementKind::Function, name, node));
                }
                Some(())
            }
            // `source lib.sh` and `. lib.sh`
            "command" => {
                if field_text(node, "name", source).is_some_and(|name| matches!(name, "source" | "."))
                    && let Some(path) = field_text(node, "argument", source)
                {
                    elements.push(element_at(ElementKind::Import, unquote(path), node));
                }
                None
            }
            "variable_assignment" => {
                if is_file_level(node)
                    && let Some(name) = field_text(node, "name", source)
                {
                    elements.push(element_at(ElementKind::Variable, name, node));
                }
                None
            }
            _ => Some(()),
        });

        Ok(Extraction::syntax(elements))
    }

    fn name(&self) -> &'static str {
        "bash"
    }
}

/// `NAME=value` or `export NAME=value` outside any function or block
fn is_file_level(assignment: Node) -> bool {
    parent_kind_is(assignment, "program")
        || assignment.parent().is_some_and(|parent| {
            parent.kind() == "declaration_command" && parent_kind_is(parent, "program")
        })
}
