//! `htmlworks init [DIR]`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use htmlworks_core::config::{self, InitOutcome, CONFIG_FILE_NAME};

/// Scaffold a new site.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize.
    #[arg(default_value = ".")]
    pub dir: PathBuf,
}

impl InitArgs {
    pub fn run(self) -> Result<()> {
        let outcome = config::init_at(&self.dir)
            .with_context(|| format!("failed to init '{}'", self.dir.display()))?;

        let config_path = self.dir.join(CONFIG_FILE_NAME);
        match outcome {
            InitOutcome::Created => {
                println!("✓ Created {}", config_path.display());
                println!("  Put pages in contents/, partials in contents/_parts/, assets in resources/");
            }
            InitOutcome::AlreadyExists => {
                println!("{} already exists; nothing to do", config_path.display());
            }
        }
        Ok(())
    }
}
