//! Write-if-changed and delete primitives.
//!
//! ## `write_if_changed`
//!
//! 1. Read the existing target, if any.
//! 2. Compare byte-for-byte with the freshly produced content → skip if identical.
//! 3. Write to `<target>.htmlworks.tmp`.
//! 4. Rename to the final path (atomic on POSIX).
//!
//! The comparison is always against the bytes on disk, never a stored hash,
//! so hand edits to generated files are detected and overwritten.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;

use htmlworks_core::RelativePath;

use crate::error::{io_err, SyncError};

pub const TMP_SUFFIX: &str = ".htmlworks.tmp";

// ---------------------------------------------------------------------------
// Write result
// ---------------------------------------------------------------------------

/// Outcome for a single generate-root path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum WriteResult {
    /// Target did not exist and was written.
    Created { path: RelativePath },
    /// Target existed with different bytes and was overwritten.
    Updated { path: RelativePath },
    /// Target already matched; nothing written.
    Unchanged { path: RelativePath },
    /// Target had no source and was removed.
    Deleted { path: RelativePath },
    /// Target has no source but deletion is disabled; left in place.
    Stale { path: RelativePath },
    /// The page could not be rendered; any existing target is left alone.
    Failed { path: RelativePath, reason: String },
}

impl WriteResult {
    pub fn path(&self) -> &RelativePath {
        match self {
            WriteResult::Created { path }
            | WriteResult::Updated { path }
            | WriteResult::Unchanged { path }
            | WriteResult::Deleted { path }
            | WriteResult::Stale { path }
            | WriteResult::Failed { path, .. } => path,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WriteResult::Created { .. } => "created",
            WriteResult::Updated { .. } => "updated",
            WriteResult::Unchanged { .. } => "unchanged",
            WriteResult::Deleted { .. } => "deleted",
            WriteResult::Stale { .. } => "stale",
            WriteResult::Failed { .. } => "failed",
        }
    }
}

// ---------------------------------------------------------------------------
// write_if_changed
// ---------------------------------------------------------------------------

/// Make `target` hold exactly `content`, writing only when it differs.
///
/// `key` is the generate-root-relative identity recorded in the result.
pub(crate) fn write_if_changed(
    key: &RelativePath,
    target: &Path,
    content: &[u8],
    dry_run: bool,
) -> Result<WriteResult, SyncError> {
    let tmp = PathBuf::from(format!("{}{TMP_SUFFIX}", target.display()));
    write_if_changed_with_tmp(key, target, content, dry_run, &tmp)
}

fn write_if_changed_with_tmp(
    key: &RelativePath,
    target: &Path,
    content: &[u8],
    dry_run: bool,
    tmp: &Path,
) -> Result<WriteResult, SyncError> {
    let result = match read_existing(target)? {
        None => WriteResult::Created { path: key.clone() },
        Some(existing) if existing == content => {
            tracing::debug!("unchanged: {}", key);
            return Ok(WriteResult::Unchanged { path: key.clone() });
        }
        Some(_) => WriteResult::Updated { path: key.clone() },
    };

    if dry_run {
        tracing::info!("[dry-run] would be {}: {}", result.label(), key);
        return Ok(result);
    }

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    if let Some(tmp_parent) = tmp.parent() {
        std::fs::create_dir_all(tmp_parent).map_err(|e| io_err(tmp_parent, e))?;
    }
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, target) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(target, e));
    }

    tracing::info!("{}: {}", result.label(), key);
    Ok(result)
}

/// Existing bytes at `path`, or `None` if nothing is there.
pub(crate) fn read_existing(path: &Path) -> Result<Option<Vec<u8>>, SyncError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(io_err(path, err)),
    }
}

// ---------------------------------------------------------------------------
// delete
// ---------------------------------------------------------------------------

/// Remove a stale output and any directories it leaves empty below `root`.
///
/// A failed removal is returned as an error; callers abort the pass.
pub(crate) fn delete_stale(
    key: &RelativePath,
    root: &Path,
    dry_run: bool,
) -> Result<WriteResult, SyncError> {
    let target = key.to_path(root);
    if dry_run {
        tracing::info!("[dry-run] would be deleted: {}", key);
        return Ok(WriteResult::Deleted { path: key.clone() });
    }

    std::fs::remove_file(&target).map_err(|e| io_err(&target, e))?;
    prune_empty_dirs(target.parent(), root)?;
    tracing::info!("deleted: {}", key);
    Ok(WriteResult::Deleted { path: key.clone() })
}

fn prune_empty_dirs(start: Option<&Path>, root: &Path) -> Result<(), SyncError> {
    let mut current = start;
    while let Some(dir) = current {
        if dir == root || !dir.starts_with(root) {
            break;
        }
        let mut entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
        if entries.next().is_some() {
            break;
        }
        std::fs::remove_dir(dir).map_err(|e| io_err(dir, e))?;
        tracing::debug!("removed empty directory {}", dir.display());
        current = dir.parent();
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
