use tree_sitter::Node;

use super::{
    Extraction, Extractor, element_at, get_node_text, parent_kind_is, parse_source, walk_scoped,
};
use crate::types::{ElementKind, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    File,
    /// Inside a class, interface, object or companion object body
    Class,
    Function,
}

pub struct KotlinExtractor;

impl Extractor for KotlinExtractor {
    fn extract(&self, content: &str) -> Result<Extraction> {
        let tree = parse_source(tree_sitter_kotlin_sg::LANGUAGE, "Kotlin", content)?;
        let source = content.as_bytes();
        let mut elements = Vec::new();

        // Most declarations in this grammar carry no field names
        walk_scoped(tree.root_node(), Scope::File, |node, scope| match node.kind() {
            "import_header" => {
                if let Some(path) = first_child(node, "identifier") {
                    elements.push(element_at(
                        ElementKind::Import,
                        get_node_text(path, source),
                        node,
                    ));
                }
                None
            }
            "class_declaration" | "object_declaration" | "interface_declaration" => {
                if let Some(name) = first_child(node, "type_identifier") {
                    elements.push(element_at(
                        ElementKind::Class,
                        get_node_text(name, source),
                        node,
                    ));
                }
                Some(Scope::Class)
            }
            "companion_object" => Some(Scope::Class),
            "function_declaration" => {
                if let Some(name) = first_child(node, "simple_identifier") {
                    let kind = if scope == Scope::Class {
                        ElementKind::Method
                    } else {
                        ElementKind::Function
                    };
                    elements.push(element_at(kind, get_node_text(name, source), node));
                }
                Some(Scope::Function)
            }
            "property_declaration" => {
                if parent_kind_is(node, "source_file")
                    && let Some(name) = first_child(node, "variable_declaration")
                        .and_then(|declaration| first_child(declaration, "simple_identifier"))
                {
                    elements.push(element_at(
                        ElementKind::Variable,
                        get_node_text(name, source),
                        node,
                    ));
                }
                None
            }
            _ => Some(scope),
        });

        Ok(Extraction::syntax(elements))
    }

    fn name(&self) -> &'static str {
        "kotlin"
    }
}

fn first_child<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).find(|child| child.kind() == kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str) -> Vec<(ElementKind, String, u32)> {
        KotlinExtractor
            .extract(source)
            .unwrap()
            .elements
            .into_iter()
            .map(|e| (e.kind(), e.name().to_string(), e.line()))
            .collect()
    }

    #[test]
    fn test_declarations() {
        let source = r#"package com.example.app

import kotlin.math.max
import com.example.util.Logger as Log

const val MAX_USERS = 100
val registry = mutableMapOf<String, User>()

data class User(val id: Int, val name: String)

interface Repository {
    fun find(id: Int): User?
}

class UserService(private val repo: Repository) : Repository {
    override fun find(id: Int): User? {
        val cached = registry[id.toString()]
        return cached ?: repo.find(id)
    }

    companion object {
        fun create(): UserService = UserService(InMemory)
    }
}

object InMemory : Repository {
    override fun find(id: Int): User? = null
}

fun String.shout(): String = uppercase()

fun main() {
    println(max(1, 2))
}
"#;
        assert_eq!(
            extract(source),
            vec![
                (ElementKind::Import, "kotlin.math.max".to_string(), 3),
                (ElementKind::Import, "com.example.util.Logger".to_string(), 4),
                (ElementKind::Variable, "MAX_USERS".to_string(), 6),
                (ElementKind::Variable, "registry".to_string(), 7),
                (ElementKind::Class, "User".to_string(), 9),
                (ElementKind::Class, "Repository".to_string(), 11),
                (ElementKind::Method, "find".to_string(), 12),
                (ElementKind::Class, "UserService".to_string(), 15),
                (ElementKind::Method, "find".to_string(), 16),
                (ElementKind::Method, "create".to_string(), 22),
                (ElementKind::Class, "InMemory".to_string(), 26),
                (ElementKind::Method, "find".to_string(), 27),
                (ElementKind::Function, "shout".to_string(), 30),
                (ElementKind::Function, "main".to_string(), 32),
            ]
        );
    }

    #[test]
    fn test_parse_failure() {
        assert!(KotlinExtractor.extract("fun broken(\n").is_err());
    }
}
