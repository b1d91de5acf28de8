//! Error types for htmlworks-renderer.

use std::path::PathBuf;

use thiserror::Error;

use htmlworks_core::ScanError;

/// Malformed JSON inside a parameter block.
///
/// Never fatal: callers log it and render with an empty context.
#[derive(Debug, Error)]
#[error("invalid parameter block: {0}")]
pub struct ParamParseError(#[from] pub serde_json::Error);

/// All errors that can arise from rendering a page.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Source bytes are not UTF-8 text.
    #[error("{name} is not valid UTF-8")]
    Decode { name: String },

    /// The template body could not be parsed (or its parent is missing).
    #[error("template syntax error in {name}: {source}")]
    TemplateSyntax {
        name: String,
        #[source]
        source: tera::Error,
    },

    /// The template parsed but failed against its context.
    #[error("failed to render {name}: {source}")]
    RenderExecution {
        name: String,
        #[source]
        source: tera::Error,
    },

    /// The parameter map could not become a Tera context.
    #[error("context error: {0}")]
    Context(#[source] tera::Error),

    /// The content tree could not be listed while loading the library.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Filesystem error while reading a source file.
    #[error("template io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    /// True when the source file itself does not exist (or is not a file).
    pub fn is_missing_source(&self) -> bool {
        matches!(
            self,
            RenderError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Message plus every underlying cause, `: `-separated.
    ///
    /// Tera keeps the useful part (line, column, offending token) in the
    /// source chain rather than the top-level message.
    pub fn detail(&self) -> String {
        let mut out = self.to_string();
        let mut cause = std::error::Error::source(self);
        while let Some(err) = cause {
            let msg = err.to_string();
            if !out.contains(&msg) {
                out.push_str(": ");
                out.push_str(&msg);
            }
            cause = err.source();
        }
        out
    }
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io {
        path: path.into(),
        source,
    }
}
