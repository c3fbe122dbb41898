//! Language Detection Module
//!
//! **Single source of truth** for language facts: display name, file
//! extensions, comment syntax, heuristic rule family and parse-tree support.
//! Dispatch, metrics and heuristic extraction all read this table.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use codescope::analyzer::language::Language;
//!
//! let lang = Language::from_path("src/Main.JAVA");
//! assert_eq!(lang, Language::Java);
//! assert_eq!(lang.as_str(), "Java");
//! assert!(lang.has_parser_support());
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// Comment Syntax
// =============================================================================

/// Comment markers of a language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentSyntax {
    /// Markers that comment out the rest of a line
    pub line: &'static [&'static str],
    /// (opener, closer) pairs; openers are checked before line markers
    pub block: &'static [(&'static str, &'static str)],
}

impl CommentSyntax {
    const fn new(
        line: &'static [&'static str],
        block: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self { line, block }
    }

    /// Used for unrecognized files
    pub const GENERIC: Self = Self::new(&["#", "//"], &[("/*", "*/")]);

    const NONE: Self = Self::new(&[], &[]);
    const HASH: Self = Self::new(&["#"], &[]);
    const C_STYLE: Self = Self::new(&["//"], &[("/*", "*/")]);
    const PYTHON: Self = Self::new(&["#"], &[("\"\"\"", "\"\"\""), ("'''", "'''")]);
    const RUBY: Self = Self::new(&["#"], &[("=begin", "=end")]);
    const PERL: Self = Self::new(&["#"], &[("=pod", "=cut")]);
    const PHP: Self = Self::new(&["//", "#"], &[("/*", "*/")]);
    const LUA: Self = Self::new(&["--"], &[("--[[", "]]")]);
    const SQL: Self = Self::new(&["--"], &[("/*", "*/")]);
    const HASKELL: Self = Self::new(&["--"], &[("{-", "-}")]);
    const ML: Self = Self::new(&[], &[("(*", "*)")]);
    const FSHARP: Self = Self::new(&["//"], &[("(*", "*)")]);
    const JULIA: Self = Self::new(&["#"], &[("#=", "=#")]);
    const NIM: Self = Self::new(&["#"], &[("#[", "]#")]);
    const POWERSHELL: Self = Self::new(&["#"], &[("<#", "#>")]);
    const MARKUP: Self = Self::new(&[], &[("<!--", "-->")]);
    const CSS: Self = Self::new(&[], &[("/*", "*/")]);
    const SCSS: Self = Self::new(&["//"], &[("/*", "*/")]);
    const COMPONENT: Self = Self::new(&["//"], &[("<!--", "-->"), ("/*", "*/")]);
    const SEMICOLON: Self = Self::new(&[";"], &[]);
    const INI: Self = Self::new(&[";", "#"], &[]);
    const PERCENT: Self = Self::new(&["%"], &[]);
    const VB: Self = Self::new(&["'"], &[]);
    const WAT: Self = Self::new(&[";;"], &[("(;", ";)")]);
}

// =============================================================================
// Heuristic Families
// =============================================================================

/// Rule family used by line-oriented extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeuristicFamily {
    Python,
    Ruby,
    CLike,
    Script,
    Jvm,
    Go,
    Rust,
    Php,
    Shell,
    Lua,
    Generic,
}

// =============================================================================
// Language Metadata Table - Single Source of Truth
// =============================================================================

/// Language metadata entry containing all language-specific information
struct LanguageMeta {
    /// Display name (human-readable, reported in analyses)
    display_name: &'static str,
    /// File extensions that map to this language
    extensions: &'static [&'static str],
    /// Alternative names for parsing from string
    aliases: &'static [&'static str],
    comments: CommentSyntax,
    /// None for data and markup languages
    family: Option<HeuristicFamily>,
    /// Whether this language has a tree-sitter extractor
    has_parser: bool,
}

/// Macro to define language metadata concisely
macro_rules! lang_meta {
    ($display:literal, [$($ext:literal),*], [$($alias:literal),*], $comments:ident, $family:ident, $parser:literal) => {
        LanguageMeta {
            display_name: $display,
            extensions: &[$($ext),*],
            aliases: &[$($alias),*],
            comments: CommentSyntax::$comments,
            family: Some(HeuristicFamily::$family),
            has_parser: $parser,
        }
    };
    ($display:literal, [$($ext:literal),*], [$($alias:literal),*], $comments:ident) => {
        LanguageMeta {
            display_name: $display,
            extensions: &[$($ext),*],
            aliases: &[$($alias),*],
            comments: CommentSyntax::$comments,
            family: None,
            has_parser: false,
        }
    };
}

impl Language {
    /// Get metadata for this language variant
    fn meta(&self) -> LanguageMeta {
        match self {
            // Systems Languages
            Language::Rust => lang_meta!("Rust", ["rs"], ["rust"], C_STYLE, Rust, true),
            Language::Go => lang_meta!("Go", ["go"], ["go", "golang"], C_STYLE, Go, true),
            Language::C => lang_meta!("C", ["c", "h"], ["c"], C_STYLE, CLike, true),
            Language::Cpp => lang_meta!("C++", ["cpp", "cc", "cxx", "c++", "hpp", "hh", "hxx", "h++"], ["cpp", "c++", "cxx"], C_STYLE, CLike, true),
            Language::Zig => lang_meta!("Zig", ["zig"], ["zig"], C_STYLE, Generic, false),
            Language::Nim => lang_meta!("Nim", ["nim"], ["nim"], NIM, Generic, false),

            // JVM Languages
            Language::Java => lang_meta!("Java", ["java"], ["java"], C_STYLE, Jvm, true),
            Language::Kotlin => lang_meta!("Kotlin", ["kt", "kts"], ["kotlin", "kt"], C_STYLE, Jvm, true),
            Language::Scala => lang_meta!("Scala", ["scala", "sc"], ["scala"], C_STYLE, Jvm, false),
            Language::Groovy => lang_meta!("Groovy", ["groovy", "gvy", "gy", "gsh"], ["groovy"], C_STYLE, Jvm, false),
            Language::Clojure => lang_meta!("Clojure", ["clj", "cljs", "cljc"], ["clojure", "clj"], SEMICOLON, Generic, false),

            // Web Languages
            Language::TypeScript => lang_meta!("TypeScript", ["ts", "mts", "cts"], ["typescript", "ts"], C_STYLE, Script, true),
            Language::JavaScript => lang_meta!("JavaScript", ["js", "mjs", "cjs"], ["javascript", "js"], C_STYLE, Script, true),
            Language::Tsx => lang_meta!("TSX", ["tsx"], ["tsx"], C_STYLE, Script, true),
            Language::Jsx => lang_meta!("JSX", ["jsx"], ["jsx"], C_STYLE, Script, true),
            Language::Vue => lang_meta!("Vue", ["vue"], ["vue"], COMPONENT, Script, false),
            Language::Svelte => lang_meta!("Svelte", ["svelte"], ["svelte"], COMPONENT, Script, false),
            Language::Html => lang_meta!("HTML", ["html", "htm"], ["html"], MARKUP),
            Language::Css => lang_meta!("CSS", ["css"], ["css"], CSS),
            Language::Scss => lang_meta!("SCSS", ["scss", "sass", "less"], ["scss", "sass"], SCSS),

            // Scripting Languages
            Language::Python => lang_meta!("Python", ["py", "pyi", "pyw"], ["python", "py"], PYTHON, Python, true),
            Language::Ruby => lang_meta!("Ruby", ["rb", "rake", "gemspec"], ["ruby", "rb"], RUBY, Ruby, true),
            Language::Php => lang_meta!("PHP", ["php", "phtml", "php3", "php4", "php5", "phps"], ["php"], PHP, Php, false),
            Language::Perl => lang_meta!("Perl", ["pl", "pm"], ["perl", "pl"], PERL, Generic, false),
            Language::Lua => lang_meta!("Lua", ["lua"], ["lua"], LUA, Lua, false),
            Language::R => lang_meta!("R", ["r"], ["r"], HASH, Generic, false),

            // Shell
            Language::Bash => lang_meta!("Bash", ["sh", "bash", "zsh", "fish"], ["bash", "sh", "shell"], HASH, Shell, true),
            Language::PowerShell => lang_meta!("PowerShell", ["ps1", "psm1", "psd1"], ["powershell", "ps1"], POWERSHELL, Generic, false),

            // Mobile
            Language::Swift => lang_meta!("Swift", ["swift"], ["swift"], C_STYLE, Jvm, false),
            Language::ObjectiveC => lang_meta!("Objective-C", ["m", "mm"], ["objectivec", "objc"], C_STYLE, CLike, false),
            Language::Dart => lang_meta!("Dart", ["dart"], ["dart"], C_STYLE, Jvm, false),

            // .NET
            Language::CSharp => lang_meta!("C#", ["cs"], ["csharp", "c#", "cs"], C_STYLE, Jvm, false),
            Language::FSharp => lang_meta!("F#", ["fs", "fsx", "fsi"], ["fsharp", "f#", "fs"], FSHARP, Generic, false),
            Language::Vb => lang_meta!("VB.NET", ["vb"], ["vb", "vb.net"], VB, Generic, false),

            // Functional
            Language::Elixir => lang_meta!("Elixir", ["ex", "exs"], ["elixir", "ex"], HASH, Generic, false),
            Language::Erlang => lang_meta!("Erlang", ["erl", "hrl"], ["erlang", "erl"], PERCENT, Generic, false),
            Language::Haskell => lang_meta!("Haskell", ["hs", "lhs"], ["haskell", "hs"], HASKELL, Generic, false),
            Language::OCaml => lang_meta!("OCaml", ["ml", "mli"], ["ocaml", "ml"], ML, Generic, false),
            Language::Crystal => lang_meta!("Crystal", ["cr"], ["crystal", "cr"], HASH, Ruby, false),
            Language::Julia => lang_meta!("Julia", ["jl"], ["julia", "jl"], JULIA, Generic, false),

            // Data/Config
            Language::Sql => lang_meta!("SQL", ["sql"], ["sql"], SQL),
            Language::Yaml => lang_meta!("YAML", ["yaml", "yml"], ["yaml", "yml"], HASH),
            Language::Json => lang_meta!("JSON", ["json", "jsonc"], ["json"], NONE),
            Language::Toml => lang_meta!("TOML", ["toml"], ["toml"], HASH),
            Language::Xml => lang_meta!("XML", ["xml", "xsd", "xsl", "xslt"], ["xml"], MARKUP),
            Language::Markdown => lang_meta!("Markdown", ["md", "markdown"], ["markdown", "md"], MARKUP),
            Language::Ini => lang_meta!("INI", ["ini", "cfg"], ["ini", "cfg"], INI),

            // Other
            Language::Makefile => lang_meta!("Makefile", [], ["makefile", "make"], HASH),
            Language::Dockerfile => lang_meta!("Dockerfile", [], ["dockerfile", "docker"], HASH),
            Language::Proto => lang_meta!("Protocol Buffers", ["proto"], ["proto", "protobuf"], C_STYLE),
            Language::GraphQL => lang_meta!("GraphQL", ["graphql", "gql"], ["graphql", "gql"], HASH),
            Language::Wasm => lang_meta!("WebAssembly", ["wat", "wast"], ["wasm", "webassembly"], WAT),

            Language::Unknown => lang_meta!("unknown", [], ["unknown", "text", ""], GENERIC),
        }
    }
}

// =============================================================================
// Language Enum Definition
// =============================================================================

/// Languages recognized by file suffix or special file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    // Systems Languages
    Rust,
    Go,
    C,
    Cpp,
    Zig,
    Nim,

    // JVM Languages
    Java,
    Kotlin,
    Scala,
    Groovy,
    Clojure,

    // Web Languages
    TypeScript,
    JavaScript,
    Tsx,
    Jsx,
    Vue,
    Svelte,
    Html,
    Css,
    Scss,

    // Scripting Languages
    Python,
    Ruby,
    Php,
    Perl,
    Lua,
    R,

    // Shell
    Bash,
    PowerShell,

    // Mobile
    Swift,
    ObjectiveC,
    Dart,

    // .NET
    CSharp,
    FSharp,
    Vb,

    // Functional
    Elixir,
    Erlang,
    Haskell,
    OCaml,
    Crystal,
    Julia,

    // Data/Config
    Sql,
    Yaml,
    Json,
    Toml,
    Xml,
    Markdown,
    Ini,

    // Other
    Makefile,
    Dockerfile,
    Proto,
    GraphQL,
    Wasm,

    #[default]
    Unknown,
}

// =============================================================================
// Language Methods (using metadata table)
// =============================================================================

impl Language {
    /// Display name, as reported in `FileAnalysis::language`
    pub fn as_str(&self) -> &'static str {
        self.meta().display_name
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        self.meta().extensions
    }

    pub fn comment_syntax(&self) -> CommentSyntax {
        self.meta().comments
    }

    /// Heuristic rule family; `None` for data and markup languages
    pub fn heuristic_family(&self) -> Option<HeuristicFamily> {
        self.meta().family
    }

    /// Detect language from file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Self {
        let ext_lower = ext.to_lowercase();

        Self::all()
            .iter()
            .copied()
            .find(|lang| lang.meta().extensions.iter().any(|e| *e == ext_lower))
            .unwrap_or(Language::Unknown)
    }

    /// Detect language from file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if let Some(filename) = path.file_name().and_then(|n| n.to_str()) {
            let lower = filename.to_lowercase();
            if lower == "makefile" || lower == "gnumakefile" {
                return Language::Makefile;
            }
            if lower == "dockerfile" || lower.starts_with("dockerfile.") {
                return Language::Dockerfile;
            }
        }

        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    /// Check if this is a known language (not Unknown)
    pub fn is_known(&self) -> bool {
        !matches!(self, Language::Unknown)
    }

    /// Check if this language has a tree-sitter extractor
    pub fn has_parser_support(&self) -> bool {
        self.meta().has_parser
    }

    /// Whether elements can be extracted at all (parse tree or heuristics)
    pub fn is_code(&self) -> bool {
        self.meta().family.is_some()
    }

    /// All known variants, in table order
    pub fn all() -> &'static [Language] {
        &[
            Language::Rust, Language::Go, Language::C, Language::Cpp,
            Language::Zig, Language::Nim, Language::Java, Language::Kotlin,
            Language::Scala, Language::Groovy, Language::Clojure,
            Language::TypeScript, Language::JavaScript, Language::Tsx,
            Language::Jsx, Language::Vue, Language::Svelte, Language::Html,
            Language::Css, Language::Scss, Language::Python, Language::Ruby,
            Language::Php, Language::Perl, Language::Lua, Language::R,
            Language::Bash, Language::PowerShell, Language::Swift,
            Language::ObjectiveC, Language::Dart, Language::CSharp,
            Language::FSharp, Language::Vb, Language::Elixir, Language::Erlang,
            Language::Haskell, Language::OCaml, Language::Crystal, Language::Julia,
            Language::Sql, Language::Yaml, Language::Json, Language::Toml,
            Language::Xml, Language::Markdown, Language::Ini, Language::Makefile,
            Language::Dockerfile, Language::Proto, Language::GraphQL, Language::Wasm,
        ]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Language {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s_lower = s.to_lowercase();

        if let Some(lang) = Self::all()
            .iter()
            .find(|lang| {
                let meta = lang.meta();
                meta.aliases.iter().any(|a| *a == s_lower) || meta.display_name.to_lowercase() == s_lower
            })
        {
            return Ok(*lang);
        }

        if s_lower.is_empty() || s_lower == "unknown" || s_lower == "text" {
            return Ok(Language::Unknown);
        }

        Err(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("rs"), Language::Rust);
        assert_eq!(Language::from_extension("RS"), Language::Rust);
        assert_eq!(Language::from_extension("py"), Language::Python);
        assert_eq!(Language::from_extension("tsx"), Language::Tsx);
        assert_eq!(Language::from_extension("jsx"), Language::Jsx);
        assert_eq!(Language::from_extension("kt"), Language::Kotlin);
        assert_eq!(Language::from_extension("unknown"), Language::Unknown);
    }

    #[test]
    fn test_from_path_is_case_insensitive() {
        assert_eq!(Language::from_path("src/main.rs"), Language::Rust);
        assert_eq!(Language::from_path("src/Main.JAVA"), Language::Java);
        assert_eq!(Language::from_path("App.Py"), Language::Python);
        assert_eq!(Language::from_path("no_extension"), Language::Unknown);
        assert_eq!(Language::from_path("archive.xyz"), Language::Unknown);
    }

    #[test]
    fn test_special_filenames() {
        assert_eq!(Language::from_path("Makefile"), Language::Makefile);
        assert_eq!(Language::from_path("makefile"), Language::Makefile);
        assert_eq!(Language::from_path("Dockerfile"), Language::Dockerfile);
        assert_eq!(Language::from_path("Dockerfile.prod"), Language::Dockerfile);
    }

    #[test]
    fn test_unknown_reports_lowercase_name() {
        assert_eq!(Language::Unknown.as_str(), "unknown");
        assert_eq!(Language::Unknown.comment_syntax(), CommentSyntax::GENERIC);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Language::Rust), "Rust");
        assert_eq!(format!("{}", Language::Cpp), "C++");
        assert_eq!(format!("{}", Language::CSharp), "C#");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("rust".parse::<Language>(), Ok(Language::Rust));
        assert_eq!("RUST".parse::<Language>(), Ok(Language::Rust));
        assert_eq!("c++".parse::<Language>(), Ok(Language::Cpp));
        assert_eq!("tsx".parse::<Language>(), Ok(Language::Tsx));
        assert_eq!("invalid_lang_xyz".parse::<Language>(), Err(()));
    }

    #[test]
    fn test_parser_support_and_families() {
        for lang in [
            Language::Python,
            Language::JavaScript,
            Language::TypeScript,
            Language::Tsx,
            Language::Jsx,
            Language::Java,
            Language::Go,
            Language::Rust,
            Language::Kotlin,
            Language::C,
            Language::Cpp,
            Language::Ruby,
            Language::Bash,
        ] {
            assert!(lang.has_parser_support(), "{lang} should have a parser");
            assert!(lang.is_code(), "{lang} needs a fallback family");
        }
        assert!(!Language::Crystal.has_parser_support());
        assert_eq!(Language::Ruby.heuristic_family(), Some(HeuristicFamily::Ruby));
        assert_eq!(Language::Json.heuristic_family(), None);
        assert!(!Language::Unknown.is_code());
    }

    #[test]
    fn test_block_openers_precede_line_markers() {
        // "--[[" must be seen as a block opener before "--" matches as a line marker
        let lua = Language::Lua.comment_syntax();
        assert!(lua.block.iter().any(|(open, _)| open.starts_with(lua.line[0])));
    }

    #[test]
    fn test_extensions_are_unique() {
        let mut seen = std::collections::HashMap::new();
        for lang in Language::all() {
            for ext in lang.extensions() {
                if let Some(previous) = seen.insert(*ext, *lang) {
                    panic!("extension {ext} claimed by {previous:?} and {lang:?}");
                }
            }
        }
    }

    #[test]
    fn test_metadata_consistency() {
        for lang in Language::all() {
            assert!(lang.is_known());
            assert!(!lang.as_str().is_empty(), "Empty display name for {:?}", lang);
            assert!(!lang.meta().aliases.is_empty(), "No aliases for {:?}", lang);
        }
    }
}
