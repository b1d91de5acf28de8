//! # htmlworks-sync
//!
//! Diff-based synchronization of the generate root.
//!
//! Call [`generate`] to render every content page, copy every resource, and
//! delete outputs that no longer have a source. Files are only written when
//! their bytes change. [`diff_site`] shows what `generate` would change
//! without touching disk.

pub mod diff;
pub mod error;
pub mod generate;
pub mod writer;

pub use diff::{diff_site, FileDiff};
pub use error::SyncError;
pub use generate::{generate, generate_with, SyncOptions, SyncReport};
pub use writer::WriteResult;
