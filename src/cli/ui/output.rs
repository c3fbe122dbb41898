use console::style;

use crate::types::ExtractionMode;

/// Styled terminal output. Status lines go to stderr so stdout stays
/// clean for reports.
pub struct Output {
    quiet: bool,
}

impl Output {
    pub fn new() -> Self {
        Self { quiet: false }
    }

    /// Suppress everything except errors
    pub fn quiet(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("✓").green(), message);
        }
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("⚠").yellow(), message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("ℹ").blue(), message);
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

/// Bold underlined heading line
pub fn header(message: &str) -> String {
    format!("{}\n", style(message).bold().underlined())
}

/// Bold title over a rule
pub fn section(message: &str) -> String {
    format!("\n{}\n{}\n", style(message).bold(), "─".repeat(40))
}

/// Extraction mode, colored by how much it can be trusted
pub fn mode_badge(mode: ExtractionMode) -> String {
    let label = mode.as_str();
    match mode {
        ExtractionMode::Syntax => style(label).green().to_string(),
        ExtractionMode::Heuristic | ExtractionMode::Degraded => style(label).yellow().to_string(),
        ExtractionMode::None | ExtractionMode::Binary | ExtractionMode::Skipped => {
            style(label).dim().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_survives_styling() {
        assert!(section("Files").contains("Files"));
        assert!(header("Review").contains("Review"));
        assert!(mode_badge(ExtractionMode::Degraded).contains("degraded"));
    }
}
