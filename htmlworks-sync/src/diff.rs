//! Dry-run unified diff support for `htmlworks diff`.

use htmlworks_core::{Config, RelativePath};
use htmlworks_renderer::PageRenderer;
use similar::TextDiff;

use crate::error::{io_err, SyncError};
use crate::generate::observe;
use crate::writer::read_existing;

/// A single generated file whose on-disk bytes differ from what a sync
/// pass would produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: RelativePath,
    pub unified_diff: String,
}

/// Render and copy everything in memory and compare it to the generate root.
///
/// No files are written. Pages that fail to render are skipped (and logged);
/// stale files show up as deletions only when deletion is enabled.
pub fn diff_site(config: &Config) -> Result<Vec<FileDiff>, SyncError> {
    let contents = config.contents_root();
    let resources = config.resources_root();
    let generate_root = config.generate_root();
    let prefix = config.resources_dir_name();

    let mut observed = observe(&generate_root)?;
    let mut expected: Vec<(RelativePath, Vec<u8>)> = Vec::new();

    let renderer = PageRenderer::load(&contents.base)?;
    for rel in contents.scan()? {
        observed.remove(&rel);
        match renderer.render_file(&contents.base, &rel) {
            Ok(bytes) => expected.push((rel, bytes)),
            Err(err) => tracing::error!("failed: {}: {}", rel, err.detail()),
        }
    }

    for rel in resources.scan()? {
        let key = rel.prefixed(&prefix);
        observed.remove(&key);
        let source = resources.path_of(&rel);
        let bytes = std::fs::read(&source).map_err(|e| io_err(&source, e))?;
        expected.push((key, bytes));
    }

    let mut diffs = Vec::new();
    for (key, rendered) in expected {
        let existing = read_existing(&generate_root.path_of(&key))?.unwrap_or_default();
        if existing == rendered {
            continue;
        }
        diffs.push(FileDiff {
            unified_diff: unified(&key, &existing, &rendered),
            path: key,
        });
    }

    if config.generate.delete {
        for key in observed {
            let existing = read_existing(&generate_root.path_of(&key))?.unwrap_or_default();
            diffs.push(FileDiff {
                unified_diff: unified(&key, &existing, &[]),
                path: key,
            });
        }
    }

    Ok(diffs)
}

fn unified(key: &RelativePath, old: &[u8], new: &[u8]) -> String {
    let old_header = format!("a/{key}");
    let new_header = format!("b/{key}");
    match (std::str::from_utf8(old), std::str::from_utf8(new)) {
        (Ok(old), Ok(new)) => TextDiff::from_lines(old, new)
            .unified_diff()
            .header(&old_header, &new_header)
            .context_radius(3)
            .to_string(),
        _ => format!("Binary files {old_header} and {new_header} differ\n"),
    }
}
