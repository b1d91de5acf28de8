//! Template library: every file under the content root, addressable by its
//! [`RelativePath`] for `include`, `extends`, and `import`.
//!
//! The library deliberately includes the exclusion directory, since that is
//! where partials live. Files that are not UTF-8, or that cannot be added to
//! the library (syntax errors, missing parents), are skipped so one broken
//! partial does not take down unrelated pages. A page that actually depends
//! on a skipped file fails on its own when rendered.

use std::path::Path;

use tera::Tera;

use htmlworks_core::{scan, RelativePath};

use crate::error::RenderError;
use crate::helpers;
use crate::params::extract;

/// Pre-built Tera instance holding all loadable content templates.
#[derive(Clone)]
pub struct TemplateLibrary {
    tera: Tera,
    skipped: Vec<String>,
}

impl TemplateLibrary {
    /// A library with helpers but no templates.
    pub fn empty() -> Self {
        let mut tera = Tera::default();
        helpers::register(&mut tera);
        TemplateLibrary {
            tera,
            skipped: Vec::new(),
        }
    }

    /// Load every file under `contents_root` (no exclusion).
    pub fn load(contents_root: &Path) -> Result<Self, RenderError> {
        let mut sources = Vec::new();
        for rel in scan(contents_root, "")? {
            let path = rel.to_path(contents_root);
            let bytes = match std::fs::read(&path) {
                Ok(bytes) => bytes,
                Err(err) => {
                    tracing::warn!("library: skipping unreadable {}: {}", path.display(), err);
                    continue;
                }
            };
            match String::from_utf8(bytes) {
                Ok(text) => {
                    let body = extract(&text).body.to_string();
                    sources.push((rel.0, body));
                }
                Err(_) => tracing::debug!("library: skipping non-UTF-8 {}", rel),
            }
        }
        Ok(Self::from_sources(sources))
    }

    /// Build from `(name, body)` pairs whose parameter blocks are already stripped.
    pub fn from_sources<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut library = Self::empty();
        let sources: Vec<(String, String)> = sources.into_iter().collect();

        let mut all = library.tera.clone();
        if all.add_raw_templates(sources.clone()).is_ok() {
            library.tera = all;
            return library;
        }

        // Something is broken. Add one at a time, retrying until no progress
        // so that children listed before their parents still get in.
        let mut pending = sources;
        loop {
            let before = pending.len();
            let mut still_pending = Vec::new();
            for (name, body) in pending {
                let mut candidate = library.tera.clone();
                match candidate.add_raw_template(&name, &body) {
                    Ok(()) => library.tera = candidate,
                    Err(_) => still_pending.push((name, body)),
                }
            }
            pending = still_pending;
            if pending.is_empty() || pending.len() == before {
                break;
            }
        }

        for (name, _) in &pending {
            tracing::debug!("library: skipping {} (does not compile)", name);
        }
        library.skipped = pending.into_iter().map(|(name, _)| name).collect();
        library
    }

    /// Names left out because they do not compile.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn contains(&self, rel: &RelativePath) -> bool {
        self.tera.get_template_names().any(|n| n == rel.as_str())
    }

    pub(crate) fn tera(&self) -> &Tera {
        &self.tera
    }
}

impl Default for TemplateLibrary {
    fn default() -> Self {
        Self::empty()
    }
}
