//! Line rules per heuristic family.
//!
//! Rules are tried in order against the masked line; the first applicable
//! rule wins. Captures are read back from the original line.

use std::sync::LazyLock;

use regex::Regex;

use super::mask::Quote;
use crate::analyzer::language::HeuristicFamily;

/// What a matching line contributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Import,
    /// Class element; opens a class scope
    Class,
    /// Component element; opens a class scope
    Component,
    /// Opens a class scope without an element (`impl`, `extension`)
    Scope,
    /// Opens a scope whose body stays top level (`namespace`, `extern "C"`)
    Namespace,
    /// Always a function
    Function,
    /// Always a method
    Method,
    /// Method directly in a class body, function anywhere else
    Callable,
    /// Method directly in a class body, ignored elsewhere
    Member,
    /// Method in a class body, function at top level, ignored elsewhere
    Declaration,
    /// Top-level only, capped per file
    Variable,
}

impl Role {
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Self::Function | Self::Method | Self::Callable | Self::Member | Self::Declaration
        )
    }
}

/// How element names are read from a match
#[derive(Debug, Clone, Copy)]
pub enum Naming {
    /// First participating group of the list
    Group(&'static [usize]),
    /// Comma-separated list in the group, aliases stripped
    List(usize),
    /// Module in group 1, imported names in group 2
    FromImport,
}

pub struct Rule {
    pub role: Role,
    pub pattern: Regex,
    pub naming: Naming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scoping {
    Braces,
    Indent,
}

/// `import (` ... `)` blocks with one import per line
pub struct ImportBlock {
    pub open: Regex,
    pub item: Regex,
    pub naming: Naming,
}

pub struct Ruleset {
    pub scoping: Scoping,
    pub quotes: &'static [Quote],
    pub rules: Vec<Rule>,
    pub import_block: Option<ImportBlock>,
    /// Separator marking `Owner<sep>name` callables as methods
    pub qualifier: Option<&'static str>,
}

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid heuristic pattern {pattern}: {e}"))
}

fn rule(role: Role, pattern: &str) -> Rule {
    Rule {
        role,
        pattern: re(pattern),
        naming: Naming::Group(&[1]),
    }
}

fn named(role: Role, pattern: &str, naming: Naming) -> Rule {
    Rule {
        role,
        pattern: re(pattern),
        naming,
    }
}

const PLAIN_QUOTES: &[Quote] = &[Quote::single_line('"'), Quote::single_line('\'')];
const SCRIPT_QUOTES: &[Quote] = &[
    Quote::single_line('"'),
    Quote::single_line('\''),
    Quote::multiline('`'),
];
const GO_QUOTES: &[Quote] = &[
    Quote::single_line('"'),
    Quote::single_line('\''),
    Quote::multiline('`'),
];
const RUST_QUOTES: &[Quote] = &[Quote::single_line('"')];

/// Words that look like callables in the patterns but never are
const KEYWORDS: &[&str] = &[
    "if", "else", "elif", "for", "foreach", "while", "do", "switch", "case", "catch", "try",
    "return", "new", "throw", "sizeof", "typeof", "delete", "when", "match", "using", "lock",
    "synchronized", "with", "await", "yield", "assert", "goto", "defer", "unless", "until",
    "echo", "print", "not", "and", "or", "in", "of",
];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

static PYTHON: LazyLock<Ruleset> = LazyLock::new(|| Ruleset {
    scoping: Scoping::Indent,
    quotes: PLAIN_QUOTES,
    rules: vec![
        named(
            Role::Import,
            r"^\s*import\s+([\w.]+(?:\s+as\s+\w+)?(?:\s*,\s*[\w.]+(?:\s+as\s+\w+)?)*)",
            Naming::List(1),
        ),
        named(
            Role::Import,
            r"^\s*from\s+([\w.]+)\s+import\s+\(?\s*([\w*][\w\s,*]*)",
            Naming::FromImport,
        ),
        rule(Role::Class, r"^\s*class\s+([A-Za-z_]\w*)"),
        rule(Role::Callable, r"^\s*(?:async\s+)?def\s+([A-Za-z_]\w*)"),
        rule(Role::Variable, r"^([A-Za-z_]\w*)\s*(?::[^=]+)?=(?:[^=]|$)"),
    ],
    import_block: None,
    qualifier: None,
});

static RUBY: LazyLock<Ruleset> = LazyLock::new(|| Ruleset {
    scoping: Scoping::Indent,
    quotes: PLAIN_QUOTES,
    rules: vec![
        named(
            Role::Import,
            r#"^\s*(?:require|require_relative|load)\s*\(?\s*(['"])([^'"]*)['"]"#,
            Naming::Group(&[2]),
        ),
        rule(Role::Class, r"^\s*(?:class|module)\s+([A-Z]\w*(?:::[A-Z]\w*)*)"),
        rule(Role::Callable, r"^\s*def\s+(?:self\.)?([A-Za-z_]\w*[?!=]?)"),
        rule(Role::Variable, r"^([A-Za-z_]\w*)\s*=(?:[^=~>]|$)"),
    ],
    import_block: None,
    qualifier: None,
});

static C_LIKE: LazyLock<Ruleset> = LazyLock::new(|| Ruleset {
    scoping: Scoping::Braces,
    quotes: PLAIN_QUOTES,
    rules: vec![
        named(
            Role::Import,
            r#"^\s*#\s*(?:include|import)\s*([<"])([^>"]*)[>"]"#,
            Naming::Group(&[2]),
        ),
        rule(Role::Import, r"^\s*using\s+namespace\s+([\w:]+)"),
        rule(Role::Import, r"^\s*@?import\s+([\w.:]+)\s*;"),
        rule(
            Role::Namespace,
            r#"^\s*(?:(?:inline\s+)?namespace(?:\s+[\w:]+)?|extern\s+"[^"]*")\s*\{?\s*$"#,
        ),
        rule(
            Role::Class,
            r"^\s*@(?:interface|implementation|protocol)\s+([A-Za-z_]\w*)",
        ),
        rule(
            Role::Class,
            r"^\s*(?:template\s*<[^>]*>\s*)?(?:typedef\s+)?(?:class|struct|union)\s+(?:\w+\s+)*?([A-Za-z_]\w*)\s*(?:final\s*)?(?:[:{]|$)",
        ),
        rule(Role::Method, r"^\s*[-+]\s*\([^)]*\)\s*([A-Za-z_]\w*)"),
        rule(
            Role::Declaration,
            r"^\s*(?:(?:static|inline|extern|virtual|explicit|constexpr|friend|unsigned|signed|const|volatile|struct|enum)\s+)*[A-Za-z_][\w:<>,]*(?:\s*[*&]+\s*|\s+)(?:[*&]+\s*)?([A-Za-z_~][\w:~]*)\s*\([^;]*$",
        ),
        rule(
            Role::Variable,
            r"^\s*(?:(?:static|const|extern|volatile|unsigned|signed)\s+)*[A-Za-z_][\w:<>]*[\s*&]+([A-Za-z_]\w*)\s*(?:\[[^\]]*\])?\s*=",
        ),
    ],
    import_block: None,
    qualifier: Some("::"),
});

static SCRIPT: LazyLock<Ruleset> = LazyLock::new(|| Ruleset {
    scoping: Scoping::Braces,
    quotes: SCRIPT_QUOTES,
    rules: vec![
        named(
            Role::Import,
            r#"^\s*import\s+(?:type\s+)?(?:[\w*${}\s,]+\s+from\s+)?(['"`])([^'"`]*)['"`]"#,
            Naming::Group(&[2]),
        ),
        named(
            Role::Import,
            r#"^\s*export\s+(?:type\s+)?(?:\*|\{[^}]*\})\s+from\s+(['"])([^'"]*)['"]"#,
            Naming::Group(&[2]),
        ),
        named(
            Role::Import,
            r#"\brequire\s*\(\s*(['"`])([^'"`]*)['"`]\s*\)"#,
            Naming::Group(&[2]),
        ),
        rule(
            Role::Component,
            r"^\s*(?:export\s+)?(?:default\s+)?class\s+([A-Za-z_$][\w$]*)(?:\s*<[^>]*>)?\s+extends\s+(?:React\.)?(?:Pure)?Component\b",
        ),
        rule(
            Role::Class,
            r"^\s*(?:export\s+)?(?:default\s+)?(?:abstract\s+)?(?:class|interface)\s+([A-Za-z_$][\w$]*)",
        ),
        rule(
            Role::Component,
            r"^\s*(?:export\s+)?(?:const|let|var)\s+([A-Z][\w$]*?[a-z][\w$]*)\s*(?::[^=]+)?=\s*(?:async\s+)?(?:function\b|\([^)]*\)\s*=>|[\w$]+\s*=>)",
        ),
        rule(
            Role::Function,
            r"^\s*(?:export\s+)?(?:default\s+)?(?:async\s+)?function\s*\*?\s*([A-Za-z_$][\w$]*)",
        ),
        rule(
            Role::Function,
            r"^\s*(?:export\s+)?(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*(?::[^=]+)?=\s*(?:async\s+)?(?:function\b|\([^)]*\)\s*(?::[^=]+)?=>|[\w$]+\s*=>)",
        ),
        rule(
            Role::Function,
            r"^\s*([A-Za-z_$][\w$]*)\s*:\s*(?:async\s+)?function\b",
        ),
        rule(
            Role::Member,
            r"^\s*(?:(?:public|private|protected|static|readonly)\s+)*([A-Za-z_$][\w$]*)\s*=\s*(?:async\s+)?(?:\([^)]*\)|[\w$]+)\s*=>",
        ),
        rule(
            Role::Member,
            r"^\s*(?:(?:public|private|protected|static|async|readonly|override|abstract|get|set)\s+)*\*?\s*(#?[A-Za-z_$][\w$]*)\s*(?:<[^>]*>)?\s*\([^)]*\)?\s*(?::\s*[^{;]+)?\{?\s*$",
        ),
        rule(
            Role::Variable,
            r"^(?:export\s+)?(?:const|let|var)\s+([A-Za-z_$][\w$]*)",
        ),
    ],
    import_block: None,
    qualifier: None,
});

static JVM: LazyLock<Ruleset> = LazyLock::new(|| Ruleset {
    scoping: Scoping::Braces,
    quotes: PLAIN_QUOTES,
    rules: vec![
        named(
            Role::Import,
            r#"^\s*import\s+(['"])([^'"]*)['"]"#,
            Naming::Group(&[2]),
        ),
        rule(
            Role::Import,
            r"^\s*import\s+(?:static\s+)?([\w.]+(?:\.\*|\._|\.\{[^}]*\})?)",
        ),
        rule(Role::Import, r"^\s*using\s+(?:static\s+)?([\w.]+)\s*;"),
        rule(Role::Namespace, r"^\s*namespace\s+[\w.]+\s*\{?\s*$"),
        rule(
            Role::Class,
            r"^\s*(?:@\w+(?:\([^)]*\))?\s+)*(?:(?:public|private|protected|internal|static|final|abstract|sealed|open|data|partial|inner|annotation|case|readonly|fileprivate|value|enum)\s+)*(?:class|interface|enum|record|struct|object|trait|protocol)\s+([A-Za-z_]\w*)",
        ),
        rule(
            Role::Scope,
            r"^\s*(?:(?:public|private|internal|fileprivate)\s+)?(?:extension\b|companion\s+object\b)",
        ),
        rule(
            Role::Callable,
            r"^\s*(?:@\w+(?:\([^)]*\))?\s+)*(?:(?:public|private|protected|internal|open|override|static|final|abstract|suspend|inline|operator|infix|tailrec|mutating|class|async|fileprivate|external)\s+)*(?:fun|func|def)\s+(?:<[^>]*>\s*)?(?:[\w.]+\.)?([A-Za-z_]\w*)",
        ),
        rule(
            Role::Member,
            r"^\s*(?:(?:public|private|protected|internal)\s+)+([A-Z]\w*)\s*\(",
        ),
        rule(
            Role::Declaration,
            r"^\s*(?:@\w+(?:\([^)]*\))?\s+)*(?:(?:public|private|protected|internal|static|final|abstract|synchronized|native|virtual|override|async|sealed|extern|unsafe|new|default|strictfp|partial)\s+)*(?:<[^>]+>\s+)?[\w.<>\[\],?]+\s+([A-Za-z_]\w*)\s*(?:<[^>]*>)?\s*\([^;]*$",
        ),
        rule(
            Role::Variable,
            r"^(?:(?:private|internal|public|const|lazy)\s+)*(?:val|var|let)\s+([A-Za-z_]\w*)",
        ),
    ],
    import_block: None,
    qualifier: None,
});

static GO: LazyLock<Ruleset> = LazyLock::new(|| Ruleset {
    scoping: Scoping::Braces,
    quotes: GO_QUOTES,
    rules: vec![
        named(
            Role::Import,
            r#"^\s*import\s+(?:[\w.]+\s+)?(["`])([^"`]*)["`]"#,
            Naming::Group(&[2]),
        ),
        rule(
            Role::Class,
            r"^\s*type\s+([A-Za-z_]\w*)(?:\[[^\]]*\])?\s+(?:struct|interface)\b",
        ),
        rule(Role::Method, r"^func\s*\([^)]*\)\s*([A-Za-z_]\w*)"),
        rule(Role::Function, r"^func\s+([A-Za-z_]\w*)"),
        rule(Role::Variable, r"^(?:var|const)\s+([A-Za-z_]\w*)"),
    ],
    import_block: Some(ImportBlock {
        open: re(r"^\s*import\s*\(\s*$"),
        item: re(r#"^\s*(?:[\w.]+\s+)?(["`])([^"`]*)["`]"#),
        naming: Naming::Group(&[2]),
    }),
    qualifier: None,
});

static RUST: LazyLock<Ruleset> = LazyLock::new(|| Ruleset {
    scoping: Scoping::Braces,
    quotes: RUST_QUOTES,
    rules: vec![
        rule(Role::Import, r"^\s*(?:pub(?:\([^)]*\))?\s+)?use\s+([^;]+)"),
        rule(Role::Import, r"^\s*extern\s+crate\s+([A-Za-z_]\w*)"),
        rule(
            Role::Class,
            r"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:unsafe\s+)?(?:struct|enum|trait|union)\s+([A-Za-z_]\w*)",
        ),
        rule(Role::Scope, r"^\s*(?:unsafe\s+)?impl\b"),
        rule(
            Role::Callable,
            r#"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:(?:const|async|unsafe|default)\s+)*(?:extern\s+(?:"[^"]*"\s+)?)?fn\s+([A-Za-z_]\w*)"#,
        ),
        rule(
            Role::Variable,
            r"^(?:pub(?:\([^)]*\))?\s+)?(?:const|static)\s+(?:mut\s+)?([A-Za-z_]\w*)",
        ),
    ],
    import_block: None,
    qualifier: None,
});

static PHP: LazyLock<Ruleset> = LazyLock::new(|| Ruleset {
    scoping: Scoping::Braces,
    quotes: PLAIN_QUOTES,
    rules: vec![
        named(
            Role::Import,
            r#"^\s*(?:require|require_once|include|include_once)\s*\(?\s*(['"])([^'"]*)['"]"#,
            Naming::Group(&[2]),
        ),
        rule(Role::Import, r"^\s*use\s+([\w\\]+)"),
        rule(
            Role::Class,
            r"^\s*(?:(?:abstract|final|readonly)\s+)*(?:class|interface|trait|enum)\s+([A-Za-z_]\w*)",
        ),
        rule(
            Role::Callable,
            r"^\s*(?:(?:public|private|protected|static|abstract|final)\s+)*function\s+&?\s*([A-Za-z_]\w*)",
        ),
        rule(Role::Variable, r"^\$([A-Za-z_]\w*)\s*=(?:[^=]|$)"),
    ],
    import_block: None,
    qualifier: None,
});

static SHELL: LazyLock<Ruleset> = LazyLock::new(|| Ruleset {
    scoping: Scoping::Braces,
    quotes: PLAIN_QUOTES,
    rules: vec![
        named(
            Role::Import,
            r#"^\s*(?:source|\.)\s+(?:(["'])([^"']*)["']|([^\s;"']+))"#,
            Naming::Group(&[2, 3]),
        ),
        rule(Role::Function, r"^\s*function\s+([A-Za-z_][\w:-]*)"),
        rule(Role::Function, r"^\s*([A-Za-z_][\w:-]*)\s*\(\s*\)"),
        rule(
            Role::Variable,
            r"^(?:export\s+|readonly\s+|declare\s+(?:-\w+\s+)?|local\s+)?([A-Za-z_]\w*)=",
        ),
    ],
    import_block: None,
    qualifier: None,
});

static LUA: LazyLock<Ruleset> = LazyLock::new(|| Ruleset {
    scoping: Scoping::Braces,
    quotes: PLAIN_QUOTES,
    rules: vec![
        named(
            Role::Import,
            r#"\brequire\s*\(?\s*(['"])([^'"]*)['"]"#,
            Naming::Group(&[2]),
        ),
        rule(Role::Callable, r"^\s*(?:local\s+)?function\s+([\w.:]+)"),
        rule(
            Role::Function,
            r"^\s*(?:local\s+)?([A-Za-z_][\w.]*)\s*=\s*function\b",
        ),
        rule(Role::Variable, r"^(?:local\s+)?([A-Za-z_]\w*)\s*=(?:[^=]|$)"),
    ],
    import_block: None,
    qualifier: Some(":"),
});

static GENERIC: LazyLock<Ruleset> = LazyLock::new(|| Ruleset {
    scoping: Scoping::Indent,
    quotes: PLAIN_QUOTES,
    rules: vec![
        rule(
            Role::Import,
            r"^\s*(?:import|require|using|include|use|from|open)\s+([\w.:/\\-]+)",
        ),
        rule(
            Role::Class,
            r"^\s*(?:class|interface|struct|module|defmodule)\s+([A-Za-z_][\w.]*)",
        ),
        rule(
            Role::Function,
            r"^\s*([A-Za-z_.][\w.]*)\s*(?:<-|=)\s*function\b",
        ),
        rule(
            Role::Callable,
            r"^\s*(?:(?:public|private|static|export|pub|inline)\s+)*(?:def|defp|function|func|fn|sub|proc|method|fun|Function|Sub)\s+([A-Za-z_][\w.!?']*)",
        ),
        rule(Role::Variable, r"^([A-Za-z_]\w*)\s*(?:=|<-)(?:[^=]|$)"),
    ],
    import_block: None,
    qualifier: None,
});

pub fn ruleset(family: HeuristicFamily) -> &'static Ruleset {
    match family {
        HeuristicFamily::Python => &PYTHON,
        HeuristicFamily::Ruby => &RUBY,
        HeuristicFamily::CLike => &C_LIKE,
        HeuristicFamily::Script => &SCRIPT,
        HeuristicFamily::Jvm => &JVM,
        HeuristicFamily::Go => &GO,
        HeuristicFamily::Rust => &RUST,
        HeuristicFamily::Php => &PHP,
        HeuristicFamily::Shell => &SHELL,
        HeuristicFamily::Lua => &LUA,
        HeuristicFamily::Generic => &GENERIC,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &[HeuristicFamily] = &[
        HeuristicFamily::Python,
        HeuristicFamily::Ruby,
        HeuristicFamily::CLike,
        HeuristicFamily::Script,
        HeuristicFamily::Jvm,
        HeuristicFamily::Go,
        HeuristicFamily::Rust,
        HeuristicFamily::Php,
        HeuristicFamily::Shell,
        HeuristicFamily::Lua,
        HeuristicFamily::Generic,
    ];

    #[test]
    fn test_every_ruleset_compiles() {
        for family in ALL {
            let rules = ruleset(*family);
            assert!(!rules.rules.is_empty(), "{family:?} has no rules");
        }
    }

    #[test]
    fn test_group_naming_indices_exist() {
        for family in ALL {
            for rule in &ruleset(*family).rules {
                let groups = rule.pattern.captures_len() - 1;
                let needed = match rule.naming {
                    Naming::Group(indices) => indices.iter().copied().max().unwrap_or(1),
                    Naming::List(index) => index,
                    Naming::FromImport => 2,
                };
                assert!(
                    needed <= groups,
                    "{family:?} rule {} lacks group {needed}",
                    rule.pattern
                );
            }
        }
    }

    #[test]
    fn test_keywords() {
        assert!(is_keyword("if"));
        assert!(is_keyword("return"));
        assert!(!is_keyword("render"));
    }
}
