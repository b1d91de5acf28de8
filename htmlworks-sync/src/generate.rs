//! Sync pass: reconcile the generate root with the current sources.
//!
//! ```text
//! observed = scan(generate)                       (empty if generate is absent)
//! for page in scan(contents, exclusion):          render → write-if-changed
//! for file in scan(resources):                    copy   → write-if-changed
//!     under <generate>/<resources_dir_name>/
//! for path in observed \ expected:                delete (or report as stale)
//! ```
//!
//! Scan, write, and delete failures abort the pass; nothing written earlier
//! in the pass is rolled back. Render failures only affect their own page.
//! Two passes must not run concurrently against the same generate root.

use std::collections::{BTreeSet, HashSet};
use std::time::Instant;

use serde::Serialize;

use htmlworks_core::{Config, RelativePath, SourceRoot};
use htmlworks_renderer::PageRenderer;

use crate::error::{io_err, SyncError};
use crate::writer::{delete_stale, write_if_changed, WriteResult};

/// Knobs that are not part of the site config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Compute everything, touch nothing.
    pub dry_run: bool,
}

/// Outcome of one sync pass, in processing order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub dry_run: bool,
    pub results: Vec<WriteResult>,
}

impl SyncReport {
    fn count(&self, pred: impl Fn(&WriteResult) -> bool) -> usize {
        self.results.iter().filter(|r| pred(r)).count()
    }

    pub fn created(&self) -> usize {
        self.count(|r| matches!(r, WriteResult::Created { .. }))
    }

    pub fn updated(&self) -> usize {
        self.count(|r| matches!(r, WriteResult::Updated { .. }))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|r| matches!(r, WriteResult::Unchanged { .. }))
    }

    pub fn deleted(&self) -> usize {
        self.count(|r| matches!(r, WriteResult::Deleted { .. }))
    }

    pub fn stale(&self) -> usize {
        self.count(|r| matches!(r, WriteResult::Stale { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|r| matches!(r, WriteResult::Failed { .. }))
    }

    /// Number of filesystem mutations the pass made (or would make).
    pub fn writes(&self) -> usize {
        self.created() + self.updated() + self.deleted()
    }

    /// Result for a generate-root-relative path, if it was touched by the pass.
    pub fn get(&self, path: &str) -> Option<&WriteResult> {
        self.results.iter().find(|r| r.path().as_str() == path)
    }
}

/// Run a sync pass with default options.
pub fn generate(config: &Config) -> Result<SyncReport, SyncError> {
    generate_with(config, SyncOptions::default())
}

/// Run a sync pass.
pub fn generate_with(config: &Config, options: SyncOptions) -> Result<SyncReport, SyncError> {
    let started = Instant::now();
    let dry_run = options.dry_run;
    let contents = config.contents_root();
    let resources = config.resources_root();
    let generate_root = config.generate_root();
    let resources_prefix = config.resources_dir_name();

    tracing::info!("contents directory: {}", contents.base.display());
    tracing::info!("exclusion directory: {}", config.directories.exclusion);
    tracing::info!("resources directory: {}", resources.base.display());
    tracing::info!("generate directory: {}", generate_root.base.display());

    // 1. What exists now.
    let mut observed = observe(&generate_root)?;
    tracing::debug!("{} file(s) already generated", observed.len());

    let mut report = SyncReport {
        dry_run,
        results: Vec::new(),
    };
    let mut produced: HashSet<RelativePath> = HashSet::new();

    // 2. Content pages.
    let renderer = PageRenderer::load(&contents.base)?;
    let pages = contents.scan()?;
    tracing::info!("rendering {} content file(s)", pages.len());
    for rel in pages {
        observed.remove(&rel);
        produced.insert(rel.clone());
        let result = match renderer.render_file(&contents.base, &rel) {
            Ok(bytes) => write_if_changed(&rel, &generate_root.path_of(&rel), &bytes, dry_run)?,
            Err(err) => {
                let reason = err.detail();
                tracing::error!("failed: {}: {}", rel, reason);
                WriteResult::Failed { path: rel, reason }
            }
        };
        report.results.push(result);
    }

    // 3. Resources, byte-for-byte.
    let files = resources.scan()?;
    tracing::info!("copying {} resource file(s)", files.len());
    for rel in files {
        let key = rel.prefixed(&resources_prefix);
        observed.remove(&key);
        if !produced.insert(key.clone()) {
            tracing::warn!("resource {} overrides rendered page {}", rel, key);
        }
        let source = resources.path_of(&rel);
        let bytes = std::fs::read(&source).map_err(|e| io_err(&source, e))?;
        let result = write_if_changed(&key, &generate_root.path_of(&key), &bytes, dry_run)?;
        report.results.push(result);
    }

    // 4. Whatever is left has no source.
    for key in observed {
        let result = if config.generate.delete {
            delete_stale(&key, &generate_root.base, dry_run)?
        } else {
            tracing::warn!("stale: {} (delete disabled)", key);
            WriteResult::Stale { path: key }
        };
        report.results.push(result);
    }

    tracing::info!(
        "generate finished in {} µs: {} created, {} updated, {} unchanged, {} deleted, {} stale, {} failed",
        started.elapsed().as_micros(),
        report.created(),
        report.updated(),
        report.unchanged(),
        report.deleted(),
        report.stale(),
        report.failed(),
    );
    Ok(report)
}

/// Files currently under the generate root; empty when it does not exist yet.
pub(crate) fn observe(root: &SourceRoot) -> Result<BTreeSet<RelativePath>, SyncError> {
    if !root.base.exists() {
        return Ok(BTreeSet::new());
    }
    Ok(root.scan()?.into_iter().collect())
}
