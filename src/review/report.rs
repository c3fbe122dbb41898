use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analyzer::aggregate::generate_project_summary;
use crate::types::{FileAnalysis, ProjectSummary};

/// Result of reviewing a project: every file record plus the rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectReview {
    pub generated_at: DateTime<Utc>,
    pub root: String,
    pub files: Vec<FileAnalysis>,
    pub summary: ProjectSummary,
}

impl ProjectReview {
    /// Orders records by path and aggregates them.
    pub fn new(root: impl Into<String>, mut files: Vec<FileAnalysis>) -> Self {
        files.sort_by(|a, b| a.path.cmp(&b.path));
        let summary = generate_project_summary(&files);
        Self {
            generated_at: Utc::now(),
            root: root.into(),
            files,
            summary,
        }
    }

    pub fn file(&self, path: &str) -> Option<&FileAnalysis> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Records carrying at least one warning
    pub fn files_with_warnings(&self) -> impl Iterator<Item = &FileAnalysis> {
        self.files.iter().filter(|f| !f.warnings.is_empty())
    }

    pub fn to_json(&self) -> crate::types::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
