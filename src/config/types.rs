//! Configuration Types
//!
//! All configuration structures with sensible defaults.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{analysis, pipeline};
use crate::types::{Result, ScopeError};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// File selection and extraction settings
    pub analysis: AnalysisConfig,

    /// Review pipeline settings
    pub pipeline: PipelineConfig,

    /// Built-in enrichers
    pub enrich: EnrichConfig,
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `ScopeError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.analysis.max_file_size == 0 {
            return Err(ScopeError::Config(
                "analysis.max_file_size must be greater than 0".to_string(),
            ));
        }

        if self.pipeline.file_timeout_ms == 0 {
            return Err(ScopeError::Config(
                "pipeline.file_timeout_ms must be greater than 0".to_string(),
            ));
        }

        for pattern in self.analysis.include.iter().chain(&self.analysis.exclude) {
            glob::Pattern::new(pattern).map_err(|e| {
                ScopeError::Config(format!("Invalid glob pattern '{}': {}", pattern, e))
            })?;
        }

        Ok(())
    }
}

// =============================================================================
// Analysis Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Globs a relative path must match; empty means every file
    pub include: Vec<String>,

    /// Globs excluded in addition to the built-in skip directories
    pub exclude: Vec<String>,

    /// Larger files are not analyzed (bytes)
    pub max_file_size: u64,

    /// Cap on top-level variables reported by heuristic extraction
    pub max_heuristic_variables: usize,

    /// Keep file text in each record
    pub include_content: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
            max_file_size: analysis::MAX_FILE_SIZE,
            max_heuristic_variables: analysis::MAX_HEURISTIC_VARIABLES,
            include_content: true,
        }
    }
}

// =============================================================================
// Pipeline Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Files analyzed at once; 0 uses the available parallelism
    pub concurrency: usize,

    /// Wall-clock budget per file
    pub file_timeout_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: 0,
            file_timeout_ms: pipeline::DEFAULT_FILE_TIMEOUT_MS,
        }
    }
}

impl PipelineConfig {
    pub fn effective_concurrency(&self) -> usize {
        if self.concurrency > 0 {
            return self.concurrency;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(pipeline::FALLBACK_CONCURRENCY)
    }

    pub fn file_timeout(&self) -> Duration {
        Duration::from_millis(self.file_timeout_ms)
    }
}

// =============================================================================
// Enrichment Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichConfig {
    /// Attach the keyword-based complexity estimate
    pub complexity: bool,

    /// Flag long callables, complex conditions, magic numbers and long
    /// parameter lists
    pub smells: bool,

    /// Flag injection, hard-coded secret and weak hash patterns
    pub security: bool,

    /// Attach a 0-100 quality score with improvement suggestions
    pub quality: bool,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            complexity: true,
            smells: true,
            security: true,
            quality: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.analysis.max_heuristic_variables, 10);
        assert!(config.enrich.complexity);
        assert!(config.enrich.smells && config.enrich.security && config.enrich.quality);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.pipeline.file_timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.analysis.exclude = vec!["[".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_effective_concurrency() {
        let mut pipeline = PipelineConfig::default();
        assert!(pipeline.effective_concurrency() >= 1);
        pipeline.concurrency = 3;
        assert_eq!(pipeline.effective_concurrency(), 3);
        assert_eq!(pipeline.file_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str("[pipeline]\nconcurrency = 2\n").unwrap();
        assert_eq!(config.pipeline.concurrency, 2);
        assert_eq!(config.pipeline.file_timeout_ms, 5_000);
        assert!(config.analysis.include_content);
    }
}
