//! Languages Command
//!
//! Lists recognized languages with their extensions and extraction strategy.

use std::fmt::Write as _;

use crate::analyzer::extractor::ExtractorRegistry;
use crate::analyzer::language::Language;
use crate::cli::ui::section;
use crate::types::Result;

pub fn run() -> Result<()> {
    print!("{}", render(&ExtractorRegistry::with_defaults()));
    Ok(())
}

/// One row per language: name, strategy, extensions
pub fn render(registry: &ExtractorRegistry) -> String {
    let mut text = section("Languages");
    for &language in Language::all() {
        let _ = writeln!(
            text,
            "{:<14} {:<10} {}",
            language.as_str(),
            strategy(registry, language),
            language.extensions().join(", ")
        );
    }
    text
}

fn strategy(registry: &ExtractorRegistry, language: Language) -> &'static str {
    match registry.resolve(language).name() {
        "none" => "none",
        "heuristic" => "heuristic",
        _ => "syntax",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_per_language() {
        let registry = ExtractorRegistry::with_defaults();
        assert_eq!(strategy(&registry, Language::Python), "syntax");
        assert_eq!(strategy(&registry, Language::Ruby), "syntax");
        assert_eq!(strategy(&registry, Language::Lua), "heuristic");
        assert_eq!(strategy(&registry, Language::Json), "none");
    }

    #[test]
    fn test_render_lists_every_language() {
        let text = render(&ExtractorRegistry::with_defaults());
        assert!(text.contains("Rust"));
        assert!(text.lines().count() > Language::all().len());
    }
}
