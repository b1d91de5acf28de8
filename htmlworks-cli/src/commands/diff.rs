//! `htmlworks diff`: show unified diffs for what `gen` would write.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use htmlworks_sync::diff_site;

/// Arguments for `htmlworks diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {}

impl DiffArgs {
    pub fn run(self, config_path: &Path) -> Result<()> {
        let config = crate::load_config(config_path)?;
        let diffs = diff_site(&config).context("diff failed")?;

        if diffs.is_empty() {
            println!("No differences.");
            return Ok(());
        }

        for diff in diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }

        Ok(())
    }
}
