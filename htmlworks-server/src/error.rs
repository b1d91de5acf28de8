use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Error surface for the dev server runtime.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ServerError {
    ServerError::Io {
        path: path.into(),
        source,
    }
}
