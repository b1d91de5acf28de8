//! Recursive tree listing.
//!
//! Rules, applied at every depth below the root:
//! - any entry whose name starts with `.` is skipped (directories are not entered)
//! - a directory named exactly `excluded_dir_name` is skipped
//! - every other non-directory entry is emitted relative to the root
//! - entries whose relative path is not valid UTF-8 are skipped with a warning,
//!   since a [`RelativePath`] could not name them
//!
//! Entries are visited in file-name order within each directory, so the
//! result is deterministic for a given tree.

use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use crate::error::ScanError;
use crate::types::RelativePath;

/// List every file under `root`, relative to it.
///
/// `excluded_dir_name` may be empty, meaning no exclusion. Fails with
/// [`ScanError`] if `root` (or any directory below it) cannot be listed.
pub fn scan(root: &Path, excluded_dir_name: &str) -> Result<Vec<RelativePath>, ScanError> {
    let meta = std::fs::metadata(root).map_err(|e| ScanError::Unreadable {
        path: root.to_path_buf(),
        source: e,
    })?;
    if !meta.is_dir() {
        return Err(ScanError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| is_visible(e, excluded_dir_name));

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| ScanError::Walk {
            root: root.to_path_buf(),
            source: e,
        })?;
        if entry.file_type().is_dir() {
            continue;
        }
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if rel.to_str().is_none() {
            tracing::warn!("skipping non-UTF-8 path {}", entry.path().display());
            continue;
        }
        files.push(RelativePath::from_path(rel));
    }

    tracing::debug!("scanned {}: {} file(s)", root.display(), files.len());
    Ok(files)
}

fn is_visible(entry: &DirEntry, excluded_dir_name: &str) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        return false;
    }
    !(entry.file_type().is_dir() && !excluded_dir_name.is_empty() && name == excluded_dir_name)
}
