//! Error types for htmlworks-sync.

use std::path::PathBuf;

use thiserror::Error;

use htmlworks_core::ScanError;
use htmlworks_renderer::RenderError;

/// Errors that abort a sync pass.
///
/// Per-page render failures are not here: they are recorded in the report
/// and the pass continues.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A source or generate tree could not be listed.
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// The template library could not be built.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
