use std::collections::HashMap;
use std::sync::Arc;

use super::{
    BashExtractor, CExtractor, CppExtractor, Dialect, Extraction, Extractor, GoExtractor,
    HeuristicExtractor, JavaExtractor, KotlinExtractor, PythonExtractor, RubyExtractor,
    RustExtractor, TypeScriptExtractor,
};
use crate::analyzer::language::Language;
use crate::constants::analysis::MAX_HEURISTIC_VARIABLES;
use crate::types::Result;

/// Shared extractor for thread-safe access
pub type SharedExtractor = Arc<dyn Extractor>;

/// Zero elements; used for unknown and data languages.
pub struct NullExtractor;

impl Extractor for NullExtractor {
    fn extract(&self, _content: &str) -> Result<Extraction> {
        Ok(Extraction::none())
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// Lookup table from language to extraction strategy.
///
/// Languages without an entry resolve to [`NullExtractor`]. Registering a
/// language replaces its previous strategy.
pub struct ExtractorRegistry {
    extractors: HashMap<Language, SharedExtractor>,
    null: SharedExtractor,
    max_variables: usize,
}

impl ExtractorRegistry {
    /// Empty registry; every language resolves to [`NullExtractor`].
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
            null: Arc::new(NullExtractor),
            max_variables: MAX_HEURISTIC_VARIABLES,
        }
    }

    /// Built-in strategies: parse trees where a grammar is bundled,
    /// heuristics for every other code language.
    pub fn with_defaults() -> Self {
        Self::with_variable_cap(MAX_HEURISTIC_VARIABLES)
    }

    /// Built-in strategies with a custom cap on heuristic top-level variables.
    pub fn with_variable_cap(max_variables: usize) -> Self {
        let mut registry = Self {
            max_variables,
            ..Self::new()
        };

        let tsx: SharedExtractor = Arc::new(TypeScriptExtractor::new(Dialect::Tsx));
        registry.register(Language::Python, Arc::new(PythonExtractor));
        registry.register(
            Language::TypeScript,
            Arc::new(TypeScriptExtractor::new(Dialect::TypeScript)),
        );
        registry.register(Language::JavaScript, tsx.clone());
        registry.register(Language::Jsx, tsx.clone());
        registry.register(Language::Tsx, tsx);
        registry.register(Language::Java, Arc::new(JavaExtractor));
        registry.register(Language::Go, Arc::new(GoExtractor));
        registry.register(Language::Rust, Arc::new(RustExtractor));
        registry.register(Language::Kotlin, Arc::new(KotlinExtractor));
        registry.register(Language::C, Arc::new(CExtractor));
        registry.register(Language::Cpp, Arc::new(CppExtractor));
        registry.register(Language::Ruby, Arc::new(RubyExtractor));
        registry.register(Language::Bash, Arc::new(BashExtractor));

        for language in Language::all() {
            if language.is_code() && !registry.extractors.contains_key(language) {
                let heuristic = registry.fallback(*language);
                registry.register(*language, heuristic);
            }
        }

        registry
    }

    pub fn register(&mut self, language: Language, extractor: SharedExtractor) -> &mut Self {
        self.extractors.insert(language, extractor);
        self
    }

    pub fn resolve(&self, language: Language) -> SharedExtractor {
        self.extractors
            .get(&language)
            .cloned()
            .unwrap_or_else(|| self.null.clone())
    }

    /// Heuristic strategy used when a parse tree cannot be built
    pub fn fallback(&self, language: Language) -> SharedExtractor {
        Arc::new(HeuristicExtractor::new(language).with_max_variables(self.max_variables))
    }

    pub fn is_registered(&self, language: Language) -> bool {
        self.extractors.contains_key(&language)
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ElementKind, ExtractionMode};

    struct Fixed;

    impl Extractor for Fixed {
        fn extract(&self, _content: &str) -> Result<Extraction> {
            Ok(Extraction::heuristic(vec![crate::types::CodeElement::new(
                ElementKind::Class,
                "Fixed",
                1,
            )]))
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    #[test]
    fn test_defaults_cover_code_languages() {
        let registry = ExtractorRegistry::with_defaults();
        for language in Language::all() {
            assert_eq!(
                registry.is_registered(*language),
                language.is_code(),
                "{language}"
            );
        }
        assert!(!registry.is_registered(Language::Unknown));
    }

    #[test]
    fn test_parse_tree_languages() {
        let registry = ExtractorRegistry::with_defaults();
        assert_eq!(registry.resolve(Language::Python).name(), "python");
        assert_eq!(registry.resolve(Language::Go).name(), "go");
        assert_eq!(registry.resolve(Language::Ruby).name(), "ruby");
        assert_eq!(registry.resolve(Language::Cpp).name(), "cpp");
        assert_eq!(registry.resolve(Language::Kotlin).name(), "kotlin");
        assert_eq!(registry.resolve(Language::Lua).name(), "heuristic");
        assert_eq!(registry.resolve(Language::Json).name(), "none");
        assert_eq!(registry.resolve(Language::Unknown).name(), "none");
    }

    #[test]
    fn test_null_extractor() {
        let extraction = ExtractorRegistry::new()
            .resolve(Language::Python)
            .extract("def foo(): pass")
            .unwrap();
        assert_eq!(extraction.mode, ExtractionMode::None);
        assert!(extraction.elements.is_empty());
    }

    #[test]
    fn test_register_replaces_strategy() {
        let mut registry = ExtractorRegistry::with_defaults();
        registry.register(Language::Python, Arc::new(Fixed));
        let extraction = registry.resolve(Language::Python).extract("").unwrap();
        assert_eq!(extraction.elements[0].name(), "Fixed");

        registry.register(Language::Unknown, Arc::new(Fixed));
        assert_eq!(registry.resolve(Language::Unknown).name(), "fixed");
    }

    #[test]
    fn test_fallback_respects_variable_cap() {
        let registry = ExtractorRegistry::with_variable_cap(2);
        let source: String = (0..5).map(|i| format!("v{i} = {i}\n")).collect();
        let extraction = registry.fallback(Language::Python).extract(&source).unwrap();
        assert_eq!(extraction.elements.len(), 2);
        assert_eq!(extraction.mode, ExtractionMode::Heuristic);
    }
}
