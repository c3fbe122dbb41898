//! Config Command
//!
//! Inspect codescope configuration.
//!
//! Usage:
//!   codescope config show [PATH]
//!   codescope config path [PATH]

use std::path::Path;

use crate::cli::util::CommandContext;
use crate::config::ConfigLoader;
use crate::review::resolve_root;
use crate::types::Result;

/// Print the effective configuration (all layers merged) as TOML
pub fn show(path: Option<&Path>) -> Result<()> {
    let ctx = CommandContext::load(path)?;
    println!("# Effective configuration for {}\n", ctx.project_root.display());
    print!("{}", ConfigLoader::render(&ctx.config)?);
    Ok(())
}

/// Print where each configuration layer is read from
pub fn path(path: Option<&Path>) -> Result<()> {
    let root = resolve_root(path)?;
    let status = |p: &Path| if p.exists() { "found" } else { "not found" };

    match ConfigLoader::global_config_path() {
        Some(global) => println!("Global:  {} ({})", global.display(), status(&global)),
        None => println!("Global:  cannot determine config directory"),
    }
    let project = ConfigLoader::project_config_path(&root);
    println!("Project: {} ({})", project.display(), status(&project));
    println!("Env:     CODESCOPE_<SECTION>__<KEY>");
    Ok(())
}
