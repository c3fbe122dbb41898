//! Analyze Command
//!
//! Scans a directory, reviews every selected file and prints the report.
//!
//! Usage:
//!   codescope analyze [PATH] [--format text|json] [--output FILE]
//!                     [--concurrency N] [--timeout-ms N] [--no-content]

use std::fmt::Write as _;
use std::path::PathBuf;

use crate::cli::ui::{Output, header, mode_badge, section};
use crate::cli::util::{CommandContext, OutputFormat};
use crate::review::ProjectReview;
use crate::types::{ElementKind, Result};

#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    pub path: Option<PathBuf>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub concurrency: Option<usize>,
    pub timeout_ms: Option<u64>,
    pub no_content: bool,
    pub quiet: bool,
}

pub async fn run(options: AnalyzeOptions) -> Result<()> {
    let out = Output::quiet(options.quiet);
    let mut ctx = CommandContext::load(options.path.as_deref())?;
    ctx.override_with(options.concurrency, options.timeout_ms, options.no_content)?;

    let scanner = ctx.scanner()?;
    let review = ctx.pipeline().review_dir(&scanner).await?;

    let rendered = match options.format {
        OutputFormat::Json => review.to_json()?,
        OutputFormat::Text => render_text(&review),
    };

    match &options.output {
        Some(path) => {
            tokio::fs::write(path, console::strip_ansi_codes(&rendered).as_bytes()).await?;
            out.success(&format!(
                "Reviewed {} files, report written to {}",
                review.files.len(),
                path.display()
            ));
        }
        None => println!("{}", rendered),
    }

    let flagged = review.files_with_warnings().count();
    if flagged > 0 {
        out.warning(&format!("{} files produced warnings", flagged));
    }
    Ok(())
}

/// Human-readable report: one block per file, then the project summary
pub fn render_text(review: &ProjectReview) -> String {
    let mut text = header(&format!("codescope review: {}", review.root));

    text.push_str(&section("Files"));
    for file in &review.files {
        let _ = writeln!(
            text,
            "{:<48} {:<12} {:>6} lines  {}",
            file.path,
            file.language,
            file.line_count,
            mode_badge(file.extraction)
        );
        let counts = element_counts(file);
        if !counts.is_empty() {
            let _ = writeln!(text, "    {}", counts);
        }
        for warning in &file.warnings {
            let _ = writeln!(text, "    {} {}", console::style("⚠").yellow(), warning);
        }
    }

    text.push_str(&summary_block(review));
    text
}

/// Project narrative with language and import breakdowns
pub fn summary_block(review: &ProjectReview) -> String {
    let summary = &review.summary;
    let mut text = section("Summary");
    let _ = writeln!(text, "{}", summary.text);

    if !summary.languages.is_empty() {
        let _ = writeln!(text, "\nLanguages:");
        for (language, count) in &summary.languages {
            let _ = writeln!(text, "  {:<16} {:>5}", language, count);
        }
    }

    if !summary.common_imports.is_empty() {
        let _ = writeln!(text, "\nCommon imports:");
        for import in &summary.common_imports {
            let _ = writeln!(text, "  {}", import);
        }
    }

    if summary.approximate_files > 0 {
        let _ = writeln!(
            text,
            "\n{} files use approximate (heuristic) extraction",
            summary.approximate_files
        );
    }
    text
}

fn element_counts(file: &crate::types::FileAnalysis) -> String {
    [
        (ElementKind::Import, "imports"),
        (ElementKind::Class, "classes"),
        (ElementKind::Function, "functions"),
        (ElementKind::Method, "methods"),
        (ElementKind::Variable, "variables"),
        (ElementKind::Component, "components"),
    ]
    .iter()
    .filter_map(|(kind, label)| match file.count(*kind) {
        0 => None,
        n => Some(format!("{} {}", n, label)),
    })
    .collect::<Vec<_>>()
    .join(", ")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::types::{ExtractionMode, FileAnalysis};

    #[test]
    fn test_render_text() {
        let mut file = FileAnalysis::empty("app.py", "Python", 10, ExtractionMode::Degraded)
            .with_warning("Parse error in app.py: syntax error at line 3");
        file.line_count = 4;
        let review = ProjectReview::new("/work", vec![file]);

        let text = console::strip_ansi_codes(&render_text(&review)).to_string();
        assert!(text.contains("codescope review: /work"));
        assert!(text.contains("app.py"));
        assert!(text.contains("degraded"));
        assert!(text.contains("Parse error in app.py"));
        assert!(text.contains("Project with 1 files"));
        assert!(text.contains("1 files use approximate"));
    }

    #[test]
    fn test_element_counts_skip_empty_kinds() {
        let analyzer = crate::analyzer::FileAnalyzer::default();
        let file = analyzer.analyze_text("m.py", "import os\n\nclass A:\n    def f(self):\n        pass\n");
        assert_eq!(element_counts(&file), "1 imports, 1 classes, 1 methods");
    }

    #[tokio::test]
    async fn test_run_writes_json_report() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("main.go"), "package main\n\nfunc main() {}\n").unwrap();
        let report = dir.path().join("out").with_extension("json");

        run(AnalyzeOptions {
            path: Some(dir.path().to_path_buf()),
            format: OutputFormat::Json,
            output: Some(report.clone()),
            no_content: true,
            quiet: true,
            ..Default::default()
        })
        .await
        .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(value["summary"]["file_count"], 1);
        assert_eq!(value["files"][0]["path"], "main.go");
        assert_eq!(value["files"][0]["content"], "");
    }
}
