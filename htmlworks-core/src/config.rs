//! `htmlworks.toml` configuration.
//!
//! # Layout
//!
//! ```text
//! <site>/
//!   htmlworks.toml
//!   contents/          templated pages (rendered)
//!     _parts/          partials, excluded from output
//!   resources/         static assets (copied verbatim)
//!   public/            generate root
//! ```
//!
//! Relative directory paths are resolved against the directory that holds
//! the config file. The loaded [`Config`] is immutable for the rest of the
//! process and passed by reference to every component.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, ConfigError};
use crate::types::SourceRoot;

pub const CONFIG_FILE_NAME: &str = "htmlworks.toml";

/// Written by `htmlworks init`.
pub const INIT_TOML: &str = r#"
### HTML Works Settings
[directories]
contents = "contents"
exclusion = "_parts"
resources = "resources"
generate = "public"

[server]
# Development server port.
port = 8088

[generate]
# Delete files that are not generated.
delete = true
"#;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoriesConfig {
    pub contents: PathBuf,
    /// Directory name skipped at any depth of the contents tree.
    pub exclusion: String,
    pub resources: PathBuf,
    pub generate: PathBuf,
}

impl Default for DirectoriesConfig {
    fn default() -> Self {
        Self {
            contents: PathBuf::from("contents"),
            exclusion: "_parts".to_string(),
            resources: PathBuf::from("resources"),
            generate: PathBuf::from("public"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8088 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Delete generated files that no longer have a source.
    pub delete: bool,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self { delete: true }
    }
}

/// Whole-file configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub directories: DirectoriesConfig,
    pub server: ServerConfig,
    pub generate: GenerateConfig,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    /// Parse TOML text without resolving or validating paths.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load, resolve, and validate the config at `path`.
    pub fn load_at(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        let config = Self::from_toml_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        let base = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let config = config.resolve_relative_to(&base);
        config.validate()?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// `load_at` on `./htmlworks.toml`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_at(Path::new(CONFIG_FILE_NAME))
    }

    /// Join every relative directory onto `base`. Absolute paths are kept.
    pub fn resolve_relative_to(mut self, base: &Path) -> Self {
        let dirs = &mut self.directories;
        for dir in [&mut dirs.contents, &mut dirs.resources, &mut dirs.generate] {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let dirs = &self.directories;
        for (key, dir) in [
            ("contents", &dirs.contents),
            ("resources", &dirs.resources),
            ("generate", &dirs.generate),
        ] {
            if dir.as_os_str().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "directories.{key} must not be empty"
                )));
            }
        }
        if self.resources_dir_name().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "directories.resources ({}) must end in a directory name",
                dirs.resources.display()
            )));
        }
        if self.directories.exclusion.contains('/') {
            return Err(ConfigError::Invalid(
                "directories.exclusion must be a single directory name".to_string(),
            ));
        }
        // A sync pass writes and deletes below the generate root.
        for (key, source) in [("contents", &dirs.contents), ("resources", &dirs.resources)] {
            if dirs.generate.starts_with(source) || source.starts_with(&dirs.generate) {
                return Err(ConfigError::Invalid(format!(
                    "directories.generate ({}) overlaps directories.{key} ({})",
                    dirs.generate.display(),
                    source.display()
                )));
            }
        }
        Ok(())
    }

    /// Final component of the resources path.
    ///
    /// Used both as the URL prefix and as the subdirectory of the generate
    /// root that mirrors the resources tree.
    pub fn resources_dir_name(&self) -> String {
        self.directories
            .resources
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn contents_root(&self) -> SourceRoot {
        SourceRoot::contents(&self.directories.contents, &self.directories.exclusion)
    }

    pub fn resources_root(&self) -> SourceRoot {
        SourceRoot::resources(&self.directories.resources)
    }

    pub fn generate_root(&self) -> SourceRoot {
        SourceRoot::generate(&self.directories.generate)
    }
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

/// Result of [`init_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// Config and directories were scaffolded.
    Created,
    /// A config already existed; nothing was touched.
    AlreadyExists,
}

/// Scaffold `htmlworks.toml`, `contents/_parts/`, and `resources/` in `dir`.
pub fn init_at(dir: &Path) -> Result<InitOutcome, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.is_file() {
        tracing::info!("{} already exists", config_path.display());
        return Ok(InitOutcome::AlreadyExists);
    }

    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
    std::fs::write(&config_path, INIT_TOML).map_err(|e| io_err(&config_path, e))?;
    tracing::info!("created {}", config_path.display());

    let defaults = DirectoriesConfig::default();
    for sub in [
        defaults.contents.join(&defaults.exclusion),
        defaults.resources,
    ] {
        let path = dir.join(sub);
        std::fs::create_dir_all(&path).map_err(|e| io_err(&path, e))?;
    }
    Ok(InitOutcome::Created)
}

/// `init_at` on the current directory.
pub fn init() -> Result<InitOutcome, ConfigError> {
    init_at(Path::new("."))
}
