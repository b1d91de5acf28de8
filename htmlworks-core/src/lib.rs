//! HTML Works core library: configuration, path types, and tree scanning.
//!
//! - [`config`]: `htmlworks.toml` loading and `init` scaffolding
//! - [`types`]: [`RelativePath`] and [`SourceRoot`]
//! - [`scan`]: recursive listing with dotfile and exclusion rules
//! - [`error`]: [`ConfigError`], [`ScanError`]

pub mod config;
pub mod error;
pub mod scan;
pub mod types;

pub use config::{Config, DirectoriesConfig, GenerateConfig, InitOutcome, ServerConfig};
pub use error::{ConfigError, ScanError};
pub use scan::scan;
pub use types::{RelativePath, RootKind, SourceRoot};
