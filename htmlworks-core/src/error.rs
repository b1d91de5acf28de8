//! Error types for htmlworks-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or scaffolding configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure, annotated with the offending path.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parse error on load.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The config file did not exist at the expected path.
    #[error("config not found at {path}; run `htmlworks init` first")]
    NotFound { path: PathBuf },

    /// The config parsed but describes an unusable layout.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// A directory tree could not be listed.
///
/// Always fatal to the enclosing operation.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot read scan root {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("scan root {path} is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("cannot list {root}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.into(),
        source,
    }
}
