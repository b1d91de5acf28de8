//! `htmlworks serve`: development server in the foreground.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use htmlworks_server::start_blocking;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Listen on this port instead of `server.port`.
    #[arg(long, short = 'p')]
    pub port: Option<u16>,
}

impl ServeArgs {
    pub fn run(self, config_path: &Path) -> Result<()> {
        let mut config = crate::load_config(config_path)?;
        if let Some(port) = self.port {
            config.server.port = port;
        }
        start_blocking(config).context("dev server exited with error")
    }
}
