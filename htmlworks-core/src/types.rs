//! Domain types shared by the scanner, renderer, and sync engine.
//!
//! A [`RelativePath`] is the identity that correlates a source file with its
//! generated counterpart. It is always `/`-separated, regardless of the host
//! path convention, and never contains a dot-prefixed segment when produced
//! by [`crate::scan`].

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ScanError;

// ---------------------------------------------------------------------------
// RelativePath
// ---------------------------------------------------------------------------

/// Slash-normalized path relative to a [`SourceRoot`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelativePath(pub String);

impl RelativePath {
    /// Build from a host path that is already relative to some root.
    ///
    /// Only normal components are kept, joined with `/`.
    pub fn from_path(rel: &Path) -> Self {
        let segments: Vec<String> = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        Self(segments.join("/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// `prefix/self`: used for resource files mirrored under the generate root.
    pub fn prefixed(&self, prefix: &str) -> Self {
        let prefix = prefix.trim_matches('/');
        if prefix.is_empty() {
            return self.clone();
        }
        Self(format!("{prefix}/{}", self.0))
    }

    /// Resolve against `base` using host separators.
    pub fn to_path(&self, base: &Path) -> PathBuf {
        self.segments().fold(base.to_path_buf(), |acc, seg| acc.join(seg))
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for RelativePath {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// SourceRoot
// ---------------------------------------------------------------------------

/// Which tree a [`SourceRoot`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootKind {
    Contents,
    Resources,
    Generate,
}

impl fmt::Display for RootKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RootKind::Contents => "contents",
            RootKind::Resources => "resources",
            RootKind::Generate => "generate",
        };
        f.write_str(s)
    }
}

/// A directory tree fixed for the duration of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRoot {
    pub kind: RootKind,
    pub base: PathBuf,
    /// Directory name skipped at any depth. Only ever set for contents.
    pub exclusion: Option<String>,
}

impl SourceRoot {
    pub fn contents(base: impl Into<PathBuf>, exclusion: &str) -> Self {
        Self {
            kind: RootKind::Contents,
            base: base.into(),
            exclusion: (!exclusion.is_empty()).then(|| exclusion.to_string()),
        }
    }

    pub fn resources(base: impl Into<PathBuf>) -> Self {
        Self {
            kind: RootKind::Resources,
            base: base.into(),
            exclusion: None,
        }
    }

    pub fn generate(base: impl Into<PathBuf>) -> Self {
        Self {
            kind: RootKind::Generate,
            base: base.into(),
            exclusion: None,
        }
    }

    /// List every file under this root, honouring its exclusion rule.
    pub fn scan(&self) -> Result<Vec<RelativePath>, ScanError> {
        crate::scan::scan(&self.base, self.exclusion.as_deref().unwrap_or(""))
    }

    /// Absolute location of `rel` inside this root.
    pub fn path_of(&self, rel: &RelativePath) -> PathBuf {
        rel.to_path(&self.base)
    }
}
