//! CLI Common Utilities
//!
//! Shared context for commands that review a directory.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::analyzer::scanner::FileScanner;
use crate::config::{Config, ConfigLoader};
use crate::review::{ReviewPipeline, resolve_root};
use crate::types::{Result, ScopeError};

/// Report rendering for `analyze`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format '{}'. Valid values: text, json", s)),
        }
    }
}

/// Command execution context
///
/// Resolved project root plus the configuration layered for it.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub project_root: PathBuf,
    pub config: Config,
}

impl CommandContext {
    /// Resolve the root (current directory when absent) and load its config
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let project_root = resolve_root(path)?;
        let config = ConfigLoader::load(&project_root)?;
        Ok(Self {
            project_root,
            config,
        })
    }

    /// Scanner configured from the `analysis` section
    pub fn scanner(&self) -> Result<FileScanner> {
        let analysis = &self.config.analysis;
        FileScanner::new(&self.project_root)
            .with_include(&analysis.include)?
            .with_exclude(&analysis.exclude)
            .map(|scanner| scanner.with_max_file_size(analysis.max_file_size))
    }

    pub fn pipeline(&self) -> ReviewPipeline {
        ReviewPipeline::from_config(&self.config)
    }

    /// Apply command-line overrides, then re-check the result
    pub fn override_with(
        &mut self,
        concurrency: Option<usize>,
        timeout_ms: Option<u64>,
        no_content: bool,
    ) -> Result<()> {
        if let Some(n) = concurrency {
            if n == 0 {
                return Err(ScopeError::Config(
                    "--concurrency must be greater than 0".to_string(),
                ));
            }
            self.config.pipeline.concurrency = n;
        }
        if let Some(ms) = timeout_ms {
            self.config.pipeline.file_timeout_ms = ms;
        }
        if no_content {
            self.config.analysis.include_content = false;
        }
        self.config.validate()
    }
}
