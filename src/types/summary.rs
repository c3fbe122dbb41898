//! Project-wide rollup types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::summary::{LARGE_ELEMENTS, MEDIUM_ELEMENTS, SMALL_ELEMENTS};

/// Project size bucket derived from the total element count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectScale {
    #[default]
    Tiny,
    Small,
    Medium,
    Large,
}

impl ProjectScale {
    pub fn from_element_count(total: u64) -> Self {
        if total > LARGE_ELEMENTS {
            Self::Large
        } else if total > MEDIUM_ELEMENTS {
            Self::Medium
        } else if total > SMALL_ELEMENTS {
            Self::Small
        } else {
            Self::Tiny
        }
    }

    /// Closing sentence of the project narrative
    pub fn sentence(&self) -> &'static str {
        match self {
            Self::Large => "This appears to be a large, complex project.",
            Self::Medium => "This is a medium-sized project with moderate complexity.",
            Self::Small => "This is a small to medium-sized project.",
            Self::Tiny => "This is a small project with relatively simple structure.",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tiny => "tiny",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl fmt::Display for ProjectScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A name with an occurrence count (languages, imports)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedCount {
    pub name: String,
    pub count: u64,
}

impl NamedCount {
    pub fn new(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

impl fmt::Display for NamedCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.count)
    }
}

/// Aggregated rollup of a set of file analyses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProjectSummary {
    pub file_count: u64,
    pub total_lines: u64,
    pub class_count: u64,
    pub function_count: u64,
    pub total_elements: u64,
    pub approximate_files: u64,
    pub languages: BTreeMap<String, u64>,
    pub dominant_languages: Vec<String>,
    pub main_languages: Vec<NamedCount>,
    pub common_imports: Vec<NamedCount>,
    pub scale: ProjectScale,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_thresholds_are_exclusive() {
        assert_eq!(ProjectScale::from_element_count(0), ProjectScale::Tiny);
        assert_eq!(ProjectScale::from_element_count(100), ProjectScale::Tiny);
        assert_eq!(ProjectScale::from_element_count(101), ProjectScale::Small);
        assert_eq!(ProjectScale::from_element_count(500), ProjectScale::Small);
        assert_eq!(ProjectScale::from_element_count(501), ProjectScale::Medium);
        assert_eq!(ProjectScale::from_element_count(1001), ProjectScale::Large);
    }

    #[test]
    fn test_named_count_display() {
        assert_eq!(NamedCount::new("Python", 3).to_string(), "Python (3)");
    }
}
