//! Summary Command
//!
//! Reviews a directory and prints only the project rollup.

use std::path::Path;

use super::analyze::summary_block;
use crate::cli::util::CommandContext;
use crate::types::Result;

pub async fn run(path: Option<&Path>) -> Result<()> {
    let mut ctx = CommandContext::load(path)?;
    ctx.override_with(None, None, true)?;

    let review = ctx.pipeline().review_dir(&ctx.scanner()?).await?;
    print!("{}", summary_block(&review));
    Ok(())
}
