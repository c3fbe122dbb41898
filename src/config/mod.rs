//! Configuration Management
//!
//! Unified configuration system with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/codescope/config.toml)
//! 3. Project config (.codescope.toml in the analyzed root)
//! 4. Environment variables (CODESCOPE_*)
//! 5. CLI arguments (highest priority, applied by the command)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
