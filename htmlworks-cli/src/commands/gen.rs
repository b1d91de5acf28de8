//! `htmlworks gen`: one-shot batch generation.

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use htmlworks_sync::{generate_with, SyncOptions, SyncReport, WriteResult};

/// Arguments for `htmlworks gen`.
#[derive(Args, Debug)]
pub struct GenArgs {
    /// Show what would change without touching the generate directory.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the full report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl GenArgs {
    pub fn run(self, config_path: &Path) -> Result<()> {
        let config = crate::load_config(config_path)?;
        let options = SyncOptions {
            dry_run: self.dry_run,
        };
        let report = generate_with(&config, options).context("generation failed")?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report);
        }

        let failed = report.failed();
        if failed > 0 {
            bail!("{failed} page(s) failed to render");
        }
        Ok(())
    }
}

fn print_report(report: &SyncReport) {
    let prefix = if report.dry_run { "[dry-run] " } else { "" };

    if report.writes() == 0 && report.deleted() == 0 && report.stale() == 0 && report.failed() == 0
    {
        println!("{prefix}✓ nothing to do ({} unchanged)", report.unchanged());
        return;
    }

    let summary = format!(
        "{} created, {} updated, {} unchanged, {} deleted, {} stale, {} failed",
        report.created(),
        report.updated(),
        report.unchanged(),
        report.deleted(),
        report.stale(),
        report.failed(),
    );
    if report.failed() > 0 {
        println!("{prefix}{} generated with errors ({summary})", "✗".red().bold());
    } else {
        println!("{prefix}{} generated ({summary})", "✓".green().bold());
    }

    for r in &report.results {
        match r {
            WriteResult::Created { path } => println!("  {}  {}", "+".green(), path),
            WriteResult::Updated { path } => println!("  {}  {}", "~".yellow(), path),
            WriteResult::Deleted { path } => println!("  {}  {}", "-".red(), path),
            WriteResult::Stale { path } => println!("  {}  {} (stale)", "?".yellow(), path),
            WriteResult::Failed { path, reason } => {
                println!("  {}  {}: {}", "✗".red().bold(), path, reason)
            }
            WriteResult::Unchanged { .. } => {}
        }
    }
}
