//! Line-oriented extraction for languages without a parse-tree extractor,
//! and the fallback when a parse tree cannot be built.
//!
//! Each line is masked first (see [`mask`]), matched against the family's
//! rules (see [`rules`]), and placed in scope by brace depth or indentation
//! so methods can be told apart from functions and top-level variables from
//! nested ones. Results are approximate.

mod mask;
mod rules;

use regex::Captures;

use self::mask::LineMasker;
use self::rules::{Naming, Role, Ruleset, Scoping};
use super::{Extraction, Extractor};
use crate::analyzer::language::{HeuristicFamily, Language};
use crate::constants::analysis::MAX_HEURISTIC_VARIABLES;
use crate::constants::complexity::INDENT_WIDTH;
use crate::types::{CodeElement, ElementKind, Result};

pub struct HeuristicExtractor {
    language: Language,
    family: HeuristicFamily,
    max_variables: usize,
}

impl HeuristicExtractor {
    /// Rules follow the language's family; languages without one use the
    /// generic rules.
    pub fn new(language: Language) -> Self {
        Self {
            language,
            family: language
                .heuristic_family()
                .unwrap_or(HeuristicFamily::Generic),
            max_variables: MAX_HEURISTIC_VARIABLES,
        }
    }

    pub fn with_max_variables(mut self, max_variables: usize) -> Self {
        self.max_variables = max_variables;
        self
    }

    pub fn scan(&self, content: &str) -> Vec<CodeElement> {
        let rules = rules::ruleset(self.family);
        let mut masker = LineMasker::new(self.language.comment_syntax(), rules.quotes);
        let mut scopes = ScopeTracker::new(rules.scoping);
        let mut scan = LineScan {
            rules,
            elements: Vec::new(),
            variables: 0,
            max_variables: self.max_variables,
        };
        let mut in_import_block = false;

        for (row, line) in content.lines().enumerate() {
            let masked = masker.mask(line);
            if masked.trim().is_empty() {
                continue;
            }

            if let Some(block) = &rules.import_block {
                if in_import_block {
                    if masked.trim_start().starts_with(')') {
                        in_import_block = false;
                    } else if let Some(caps) = block.item.captures(&masked) {
                        scan.push_names(ElementKind::Import, block.naming, &caps, line, row);
                    }
                    continue;
                }
                if block.open.is_match(&masked) {
                    in_import_block = true;
                    continue;
                }
            }

            let position = scopes.enter_line(&masked);
            if let Some(opened) = scan.match_line(line, &masked, row, position) {
                scopes.open(opened);
            }
            scopes.exit_line(&masked);
        }

        scan.elements
    }
}

impl Extractor for HeuristicExtractor {
    fn extract(&self, content: &str) -> Result<Extraction> {
        Ok(Extraction::heuristic(self.scan(content)))
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}

/// Where a line sits relative to the enclosing scopes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Position {
    top_level: bool,
    in_class_body: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    Class,
    Callable,
    /// `namespace` or `extern "C"` block; its body counts as top level
    Transparent,
}

struct LineScan {
    rules: &'static Ruleset,
    elements: Vec<CodeElement>,
    variables: usize,
    max_variables: usize,
}

impl LineScan {
    /// Apply the first applicable rule; returns the scope the line opens.
    fn match_line(
        &mut self,
        line: &str,
        masked: &str,
        row: usize,
        position: Position,
    ) -> Option<ScopeKind> {
        let rules = self.rules;
        for rule in &rules.rules {
            let Some(caps) = rule.pattern.captures(masked) else {
                continue;
            };

            if rule.role.is_callable() && looks_like_statement(masked, &caps) {
                continue;
            }

            match rule.role {
                Role::Import => {
                    self.push_names(ElementKind::Import, rule.naming, &caps, line, row);
                    return None;
                }
                Role::Class | Role::Component => {
                    let kind = if rule.role == Role::Class {
                        ElementKind::Class
                    } else {
                        ElementKind::Component
                    };
                    self.push_names(kind, rule.naming, &caps, line, row);
                    return Some(ScopeKind::Class);
                }
                Role::Scope => return Some(ScopeKind::Class),
                Role::Namespace => return Some(ScopeKind::Transparent),
                Role::Variable => {
                    if !position.top_level {
                        continue;
                    }
                    if self.variables < self.max_variables {
                        self.variables += 1;
                        self.push_names(ElementKind::Variable, rule.naming, &caps, line, row);
                    }
                    return None;
                }
                Role::Function | Role::Method | Role::Callable | Role::Member | Role::Declaration => {
                    let kind = match rule.role {
                        Role::Function => ElementKind::Function,
                        Role::Method => ElementKind::Method,
                        Role::Callable if position.in_class_body => ElementKind::Method,
                        Role::Callable => ElementKind::Function,
                        Role::Member if position.in_class_body => ElementKind::Method,
                        Role::Declaration if position.in_class_body => ElementKind::Method,
                        Role::Declaration if position.top_level => ElementKind::Function,
                        _ => continue,
                    };
                    self.push_callable(kind, rule.naming, &caps, line, row);
                    return Some(ScopeKind::Callable);
                }
            }
        }
        None
    }

    fn push_names(
        &mut self,
        kind: ElementKind,
        naming: Naming,
        caps: &Captures,
        line: &str,
        row: usize,
    ) {
        for name in names(naming, caps, line) {
            self.elements.push(CodeElement::at_row(kind, name, row));
        }
    }

    /// `Owner::name` (or `Owner:name`) declarations are methods of Owner
    fn push_callable(
        &mut self,
        kind: ElementKind,
        naming: Naming,
        caps: &Captures,
        line: &str,
        row: usize,
    ) {
        for name in names(naming, caps, line) {
            let qualified = self
                .rules
                .qualifier
                .and_then(|sep| name.rsplit_once(sep).map(|(_, method)| method.to_string()));
            let element = match qualified {
                Some(method) if !method.is_empty() => {
                    CodeElement::at_row(ElementKind::Method, method, row)
                }
                _ => CodeElement::at_row(kind, name, row),
            };
            self.elements.push(element);
        }
    }
}

/// Callable patterns also match control flow and calls such as
/// `return foo(x,` or `} else if (y) {`.
fn looks_like_statement(masked: &str, caps: &Captures) -> bool {
    let named_keyword = caps
        .get(1)
        .is_some_and(|name| rules::is_keyword(name.as_str().trim()));
    let leading_keyword = masked
        .trim_start()
        .trim_start_matches('}')
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .find(|word| !word.is_empty())
        .is_some_and(rules::is_keyword);
    named_keyword || leading_keyword
}

/// Read names for a match from the original line
fn names(naming: Naming, caps: &Captures, line: &str) -> Vec<String> {
    let text = |index: usize| -> Option<String> {
        let found = caps.get(index)?;
        let text = line
            .get(found.range())
            .unwrap_or(found.as_str())
            .trim()
            .to_string();
        (!text.is_empty()).then_some(text)
    };

    match naming {
        Naming::Group(indices) => indices
            .iter()
            .find_map(|index| text(*index))
            .into_iter()
            .collect(),
        Naming::List(index) => text(index).map(|list| split_list(&list)).unwrap_or_default(),
        Naming::FromImport => {
            let Some(module) = text(1) else {
                return Vec::new();
            };
            text(2)
                .map(|list| split_list(&list))
                .unwrap_or_default()
                .into_iter()
                .map(|name| format!("from {} import {}", module, name))
                .collect()
        }
    }
}

/// `a, b as c, (d)` -> `[a, b, d]`
fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .filter_map(|part| {
            let part = part.trim().trim_matches(|c| c == '(' || c == ')').trim();
            part.split_whitespace().next().map(str::to_string)
        })
        .collect()
}

// =============================================================================
// Scope Tracking
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct BraceScope {
    kind: ScopeKind,
    /// Depth of the scope's body
    body_depth: usize,
    /// Whether the opening brace has been seen
    entered: bool,
}

#[derive(Debug, Clone, Copy)]
struct IndentScope {
    indent: usize,
    kind: ScopeKind,
}

enum ScopeTracker {
    Braces {
        depth: usize,
        line_depth: usize,
        scopes: Vec<BraceScope>,
    },
    Indent {
        line_indent: usize,
        stack: Vec<IndentScope>,
    },
}

impl ScopeTracker {
    fn new(scoping: Scoping) -> Self {
        match scoping {
            Scoping::Braces => Self::Braces {
                depth: 0,
                line_depth: 0,
                scopes: Vec::new(),
            },
            Scoping::Indent => Self::Indent {
                line_indent: 0,
                stack: Vec::new(),
            },
        }
    }

    fn enter_line(&mut self, masked: &str) -> Position {
        match self {
            Self::Braces {
                depth,
                line_depth,
                scopes,
            } => {
                *line_depth = *depth;
                let innermost = scopes
                    .last()
                    .filter(|scope| scope.entered && scope.body_depth == *depth);
                Position {
                    top_level: *depth == 0
                        || innermost.is_some_and(|scope| scope.kind == ScopeKind::Transparent),
                    in_class_body: innermost.is_some_and(|scope| scope.kind == ScopeKind::Class),
                }
            }
            Self::Indent { line_indent, stack } => {
                let indent = indentation(masked);
                *line_indent = indent;
                while stack.last().is_some_and(|scope| scope.indent >= indent) {
                    stack.pop();
                }
                Position {
                    top_level: indent == 0,
                    in_class_body: stack
                        .last()
                        .is_some_and(|scope| scope.kind == ScopeKind::Class),
                }
            }
        }
    }

    fn open(&mut self, kind: ScopeKind) {
        match self {
            Self::Braces {
                line_depth,
                scopes,
                ..
            } => {
                // A header whose body never opened (`class Foo(val x: Int)`)
                if scopes.last().is_some_and(|scope| !scope.entered) {
                    scopes.pop();
                }
                if kind != ScopeKind::Callable {
                    scopes.push(BraceScope {
                        kind,
                        body_depth: *line_depth + 1,
                        entered: false,
                    });
                }
            }
            Self::Indent { line_indent, stack } => stack.push(IndentScope {
                indent: *line_indent,
                kind,
            }),
        }
    }

    fn exit_line(&mut self, masked: &str) {
        let Self::Braces { depth, scopes, .. } = self else {
            return;
        };

        for ch in masked.chars() {
            match ch {
                '{' => {
                    *depth += 1;
                    if let Some(scope) = scopes.last_mut()
                        && !scope.entered
                        && *depth >= scope.body_depth
                    {
                        scope.entered = true;
                    }
                }
                '}' => {
                    *depth = depth.saturating_sub(1);
                    while scopes
                        .last()
                        .is_some_and(|scope| scope.entered && *depth < scope.body_depth)
                    {
                        scopes.pop();
                    }
                }
                _ => {}
            }
        }

        // Forward declarations and unit structs end without a body
        if scopes.last().is_some_and(|scope| !scope.entered) && masked.trim_end().ends_with(';')
        {
            scopes.pop();
        }
    }
}

fn indentation(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { INDENT_WIDTH } else { 1 })
        .sum()
}
