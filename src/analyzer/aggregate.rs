//! Project-wide rollup of file analyses.

use std::collections::{BTreeMap, HashMap};

use crate::constants::summary::{TOP_IMPORTS, TOP_LANGUAGES};
use crate::types::{ElementKind, FileAnalysis, NamedCount, ProjectScale, ProjectSummary};

/// Fold file records into a [`ProjectSummary`]. Recomputed from scratch on
/// every call; empty input yields zero counts and a neutral narrative.
pub fn generate_project_summary(analyses: &[FileAnalysis]) -> ProjectSummary {
    if analyses.is_empty() {
        return ProjectSummary {
            text: "No files were analyzed.".to_string(),
            ..ProjectSummary::default()
        };
    }

    let mut summary = ProjectSummary {
        file_count: analyses.len() as u64,
        ..ProjectSummary::default()
    };
    let mut imports: HashMap<&str, u64> = HashMap::new();

    for analysis in analyses {
        summary.total_lines += analysis.line_count;
        summary.total_elements += analysis.elements.len() as u64;
        *summary
            .languages
            .entry(analysis.language.clone())
            .or_default() += 1;
        if analysis.extraction.is_approximate() {
            summary.approximate_files += 1;
        }

        for element in &analysis.elements {
            match element.kind() {
                ElementKind::Class => summary.class_count += 1,
                ElementKind::Function | ElementKind::Method => summary.function_count += 1,
                ElementKind::Import => *imports.entry(element.name()).or_default() += 1,
                _ => {}
            }
        }
    }

    summary.main_languages = top_counts(
        summary.languages.iter().map(|(name, count)| (name.as_str(), *count)),
        TOP_LANGUAGES,
    );
    summary.dominant_languages = dominant(&summary.languages);
    summary.common_imports = top_counts(imports.into_iter(), TOP_IMPORTS);
    summary.scale = ProjectScale::from_element_count(summary.total_elements);
    summary.text = project_narrative(&summary);
    summary
}

/// Highest counts first, ties by name
fn top_counts<'a>(counts: impl Iterator<Item = (&'a str, u64)>, limit: usize) -> Vec<NamedCount> {
    let mut counts: Vec<(&str, u64)> = counts.collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    counts
        .into_iter()
        .take(limit)
        .map(|(name, count)| NamedCount::new(name, count))
        .collect()
}

/// Every language sharing the maximal file count, lexicographic
fn dominant(languages: &BTreeMap<String, u64>) -> Vec<String> {
    let Some(max) = languages.values().copied().max() else {
        return Vec::new();
    };
    languages
        .iter()
        .filter(|(_, count)| **count == max)
        .map(|(name, _)| name.clone())
        .collect()
}

/// Leads with the dominant languages, then the top-ranked breakdown
fn project_narrative(summary: &ProjectSummary) -> String {
    let ranked: Vec<String> = summary.main_languages.iter().map(|l| l.to_string()).collect();
    format!(
        "Project with {} files ({} lines of code) primarily written in {}. Top languages by file count: {}. Contains {} classes and {} functions. {}",
        summary.file_count,
        summary.total_lines,
        summary.dominant_languages.join(", "),
        ranked.join(", "),
        summary.class_count,
        summary.function_count,
        summary.scale.sentence()
    )
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::types::{CodeElement, ExtractionMode};

    fn record(path: &str, language: &str, lines: u64, elements: Vec<CodeElement>) -> FileAnalysis {
        let mut analysis = FileAnalysis::empty(path, language, 0, ExtractionMode::Syntax);
        analysis.line_count = lines;
        analysis.elements = elements;
        analysis
    }

    #[test]
    fn test_empty_input() {
        let summary = generate_project_summary(&[]);
        assert_eq!(summary.file_count, 0);
        assert_eq!(summary.total_lines, 0);
        assert_eq!(summary.class_count, 0);
        assert_eq!(summary.function_count, 0);
        assert!(summary.dominant_languages.is_empty());
        assert_eq!(summary.text, "No files were analyzed.");
    }

    #[test]
    fn test_counts_across_files() {
        let files = [
            record(
                "a.py",
                "Python",
                10,
                vec![
                    CodeElement::new(ElementKind::Class, "A", 1),
                    CodeElement::new(ElementKind::Function, "f", 5),
                ],
            ),
            record("b.py", "Python", 5, vec![CodeElement::new(ElementKind::Class, "B", 1)]),
        ];
        let summary = generate_project_summary(&files);
        assert_eq!(summary.file_count, 2);
        assert_eq!(summary.class_count, 2);
        assert_eq!(summary.function_count, 1);
        assert_eq!(summary.total_lines, 15);
        assert_eq!(summary.total_elements, 3);
        assert_eq!(summary.dominant_languages, ["Python"]);
        assert_eq!(summary.scale, ProjectScale::Tiny);
        assert_eq!(
            summary.text,
            "Project with 2 files (15 lines of code) primarily written in Python. \
             Top languages by file count: Python (2). \
             Contains 2 classes and 1 functions. \
             This is a small project with relatively simple structure."
        );
    }

    #[test]
    fn test_methods_count_as_functions() {
        let files = [record(
            "a.rb",
            "Ruby",
            3,
            vec![
                CodeElement::new(ElementKind::Method, "m", 2),
                CodeElement::new(ElementKind::Variable, "v", 1),
                CodeElement::new(ElementKind::Component, "C", 3),
            ],
        )];
        assert_eq!(generate_project_summary(&files).function_count, 1);
    }

    #[test]
    fn test_language_ranking() {
        let files = [
            record("a.go", "Go", 1, vec![]),
            record("b.rs", "Rust", 1, vec![]),
            record("c.go", "Go", 1, vec![]),
            record("d.rs", "Rust", 1, vec![]),
            record("e.py", "Python", 1, vec![]),
            record("f.c", "C", 1, vec![]),
        ];
        let summary = generate_project_summary(&files);
        assert_eq!(summary.dominant_languages, ["Go", "Rust"]);
        assert_eq!(
            summary.main_languages,
            [
                NamedCount::new("Go", 2),
                NamedCount::new("Rust", 2),
                NamedCount::new("C", 1),
            ]
        );
        assert_eq!(summary.languages.len(), 4);
        assert!(summary.text.contains("primarily written in Go, Rust. "));
        assert!(summary.text.contains("Top languages by file count: Go (2), Rust (2), C (1)."));
    }

    #[test]
    fn test_narrative_names_single_leader() {
        let files = [
            record("a.ts", "TypeScript", 1, vec![]),
            record("b.ts", "TypeScript", 1, vec![]),
            record("c.css", "CSS", 1, vec![]),
            record("d.html", "HTML", 1, vec![]),
            record("e.json", "JSON", 1, vec![]),
        ];
        let summary = generate_project_summary(&files);
        assert_eq!(summary.dominant_languages, ["TypeScript"]);
        assert!(summary.text.contains("primarily written in TypeScript. "));
        assert!(
            summary
                .text
                .contains("Top languages by file count: TypeScript (2), CSS (1), HTML (1).")
        );
    }

    #[test]
    fn test_common_imports_and_approximate_files() {
        let mut heuristic = record(
            "a.rb",
            "Ruby",
            1,
            vec![
                CodeElement::new(ElementKind::Import, "json", 1),
                CodeElement::new(ElementKind::Import, "set", 2),
            ],
        );
        heuristic.extraction = ExtractionMode::Heuristic;
        let files = [
            heuristic,
            record("b.rb", "Ruby", 1, vec![CodeElement::new(ElementKind::Import, "json", 1)]),
        ];
        let summary = generate_project_summary(&files);
        assert_eq!(
            summary.common_imports,
            [NamedCount::new("json", 2), NamedCount::new("set", 1)]
        );
        assert_eq!(summary.approximate_files, 1);
    }

    #[test]
    fn test_scale_sentence() {
        let elements = (0..150)
            .map(|i| CodeElement::new(ElementKind::Variable, format!("v{i}"), i + 1))
            .collect();
        let summary = generate_project_summary(&[record("a.py", "Python", 150, elements)]);
        assert_eq!(summary.scale, ProjectScale::Small);
        assert!(summary.text.ends_with("This is a small to medium-sized project."));
    }

    proptest! {
        #[test]
        fn test_file_count_matches_input(classes in proptest::collection::vec(0usize..5, 0..20)) {
            let files: Vec<FileAnalysis> = classes
                .iter()
                .enumerate()
                .map(|(i, n)| {
                    let elements = (0..*n)
                        .map(|j| CodeElement::new(ElementKind::Class, format!("C{j}"), j as u32 + 1))
                        .collect();
                    record(&format!("f{i}.py"), "Python", 1, elements)
                })
                .collect();
            let summary = generate_project_summary(&files);
            prop_assert_eq!(summary.file_count, files.len() as u64);
            prop_assert_eq!(summary.class_count, classes.iter().sum::<usize>() as u64);
            prop_assert_eq!(summary.total_lines, files.len() as u64);
        }
    }
}
