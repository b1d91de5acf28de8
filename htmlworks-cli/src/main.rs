//! HTML Works: static site generator and development server.
//!
//! # Usage
//!
//! ```text
//! htmlworks init [DIR]
//! htmlworks serve [--port <PORT>]
//! htmlworks gen [--dry-run] [--json]
//! htmlworks diff
//! ```
//!
//! Every command except `init` reads `htmlworks.toml` from the current
//! directory, or the file given with `--config`.

mod commands;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use commands::{diff::DiffArgs, gen::GenArgs, init::InitArgs, serve::ServeArgs};
use htmlworks_core::{config::CONFIG_FILE_NAME, Config};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "htmlworks",
    version,
    about = "Render a tree of HTML templates into a static site",
    long_about = None,
)]
struct Cli {
    /// Path to the site configuration file.
    #[arg(long, short = 'c', global = true, value_name = "PATH", default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create htmlworks.toml and the default directories.
    Init(InitArgs),

    /// Run the development server, rendering pages on every request.
    Serve(ServeArgs),

    /// Render contents and copy resources into the generate directory.
    Gen(GenArgs),

    /// Show unified diff of what `gen` would change.
    Diff(DiffArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    tracing::debug!("args: {:?}", cli);
    match cli.command {
        Commands::Init(args) => args.run(),
        Commands::Serve(args) => args.run(&cli.config),
        Commands::Gen(args) => args.run(&cli.config),
        Commands::Diff(args) => args.run(&cli.config),
    }
}

pub(crate) fn load_config(path: &Path) -> Result<Config> {
    tracing::info!("load config {}", path.display());
    Config::load_at(path).with_context(|| format!("cannot load config '{}'", path.display()))
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
