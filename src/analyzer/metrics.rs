//! Line, comment and size metrics.

use crate::analyzer::language::{CommentSyntax, Language};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FileMetrics {
    pub line_count: u64,
    pub comment_count: u64,
    /// `comment_count / line_count`, or 0 for an empty file
    pub comment_ratio: f64,
    /// UTF-8 byte length
    pub size: u64,
}

impl FileMetrics {
    pub fn compute(content: &str, language: Language) -> Self {
        let syntax = language.comment_syntax();
        let mut line_count = 0u64;
        let mut comment_count = 0u64;
        let mut open_block: Option<&'static str> = None;

        for line in content.lines() {
            line_count += 1;
            let trimmed = line.trim();

            if let Some(closer) = open_block {
                comment_count += 1;
                if trimmed.contains(closer) {
                    open_block = None;
                }
                continue;
            }

            if let Some(closer) = block_opened(syntax, trimmed) {
                comment_count += 1;
                open_block = closer;
                continue;
            }

            if syntax.line.iter().any(|marker| trimmed.starts_with(marker)) {
                comment_count += 1;
            }
        }

        let comment_ratio = if line_count > 0 {
            comment_count as f64 / line_count as f64
        } else {
            0.0
        };

        Self {
            line_count,
            comment_count,
            comment_ratio,
            size: content.len() as u64,
        }
    }

    /// Truncated percentage used in narratives
    pub fn comment_percent(ratio: f64) -> u64 {
        (ratio * 100.0).floor() as u64
    }
}

/// `Some(None)` for a block that opens and closes on the line, `Some(Some(closer))`
/// for one that stays open.
fn block_opened(syntax: CommentSyntax, trimmed: &str) -> Option<Option<&'static str>> {
    let (opener, closer) = syntax
        .block
        .iter()
        .find(|(opener, _)| trimmed.starts_with(*opener))?;
    let rest = &trimmed[opener.len()..];
    if rest.contains(closer) {
        Some(None)
    } else {
        Some(Some(*closer))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_empty_file() {
        let metrics = FileMetrics::compute("", Language::Python);
        assert_eq!(metrics.line_count, 0);
        assert_eq!(metrics.comment_count, 0);
        assert_eq!(metrics.comment_ratio, 0.0);
        assert_eq!(metrics.size, 0);
    }

    #[test]
    fn test_hash_comment_ratio() {
        let metrics = FileMetrics::compute("# comment\ncode()\n", Language::Python);
        assert_eq!(metrics.line_count, 2);
        assert_eq!(metrics.comment_count, 1);
        assert_eq!(metrics.comment_ratio, 0.5);
        assert_eq!(metrics.size, 17);
    }

    #[test]
    fn test_line_terminators() {
        assert_eq!(FileMetrics::compute("a\nb", Language::Unknown).line_count, 2);
        assert_eq!(FileMetrics::compute("a\nb\n", Language::Unknown).line_count, 2);
        assert_eq!(FileMetrics::compute("a\r\nb\r\n", Language::Unknown).line_count, 2);
        assert_eq!(FileMetrics::compute("\n", Language::Unknown).line_count, 1);
    }

    #[test]
    fn test_block_comments_span_lines() {
        let source = "/*\n * License\n */\nint x; /* trailing */\n// note\n";
        let metrics = FileMetrics::compute(source, Language::C);
        assert_eq!(metrics.line_count, 5);
        assert_eq!(metrics.comment_count, 4);
    }

    #[test]
    fn test_single_line_block() {
        let source = "/* one */\nint x;\n";
        assert_eq!(FileMetrics::compute(source, Language::Java).comment_count, 1);
    }

    #[test]
    fn test_python_docstrings() {
        let source = "\"\"\"Module docs.\n\nMore.\n\"\"\"\nx = 1\n'''single'''\n";
        let metrics = FileMetrics::compute(source, Language::Python);
        assert_eq!(metrics.line_count, 6);
        assert_eq!(metrics.comment_count, 5);
    }

    #[test]
    fn test_language_specific_markers() {
        assert_eq!(FileMetrics::compute("-- sql\nSELECT 1;\n", Language::Sql).comment_count, 1);
        assert_eq!(FileMetrics::compute("--[[\nx\n]]\nprint(1)\n", Language::Lua).comment_count, 3);
        assert_eq!(FileMetrics::compute("// not json\n{}\n", Language::Json).comment_count, 0);
        assert_eq!(FileMetrics::compute("// x\n# y\nz\n", Language::Unknown).comment_count, 2);
    }

    #[test]
    fn test_comment_percent_truncates() {
        assert_eq!(FileMetrics::comment_percent(0.5), 50);
        assert_eq!(FileMetrics::comment_percent(1.0 / 3.0), 33);
        assert_eq!(FileMetrics::comment_percent(0.0), 0);
    }

    proptest! {
        #[test]
        fn test_ratio_is_bounded(content in "[#/a-z *\\n]{0,300}") {
            let metrics = FileMetrics::compute(&content, Language::Unknown);
            prop_assert!(metrics.comment_count <= metrics.line_count);
            prop_assert!((0.0..=1.0).contains(&metrics.comment_ratio));
            prop_assert_eq!(metrics.line_count, content.lines().count() as u64);
        }
    }
}
