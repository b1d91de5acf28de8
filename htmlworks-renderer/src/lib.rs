//! # htmlworks-renderer
//!
//! Turns one source page into output bytes: the embedded `<!--params ...-->`
//! block becomes the render context, the rest of the file is a Tera template.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use htmlworks_core::RelativePath;
//! use htmlworks_renderer::PageRenderer;
//!
//! fn render_home(contents: &Path) {
//!     if let Ok(renderer) = PageRenderer::load(contents) {
//!         let rel = RelativePath::from("index.html");
//!         if let Ok(bytes) = renderer.render_file(contents, &rel) {
//!             println!("{} bytes", bytes.len());
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod helpers;
pub mod library;
pub mod params;

pub use context::{to_tera_context, ParameterMap};
pub use engine::PageRenderer;
pub use error::{ParamParseError, RenderError};
pub use library::TemplateLibrary;
pub use params::{extract, Extracted, PARAM_END, PARAM_START};
