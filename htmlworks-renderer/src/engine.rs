//! Page rendering: raw source bytes to output bytes.
//!
//! # Pipeline
//!
//! 1. Decode the source as UTF-8.
//! 2. Split off the parameter block ([`crate::params::extract`]); a malformed
//!    block is logged and rendering continues with an empty context.
//! 3. Add the body to a copy of the [`TemplateLibrary`] under the page's
//!    relative path, so includes resolve against the content root.
//! 4. Render with the parameter map as the context.
//!
//! Steps 3 and 4 fail with [`RenderError::TemplateSyntax`] and
//! [`RenderError::RenderExecution`] respectively. Undefined variables are
//! execution errors.

use std::path::Path;

use htmlworks_core::RelativePath;

use crate::context::to_tera_context;
use crate::error::{io_err, RenderError};
use crate::library::TemplateLibrary;
use crate::params::extract;

/// Renders individual pages against a shared [`TemplateLibrary`].
///
/// Create once per batch pass (or per request in the dev server) and reuse.
#[derive(Clone, Default)]
pub struct PageRenderer {
    library: TemplateLibrary,
}

impl PageRenderer {
    pub fn new(library: TemplateLibrary) -> Self {
        PageRenderer { library }
    }

    /// Construct with a library loaded from `contents_root`.
    pub fn load(contents_root: &Path) -> Result<Self, RenderError> {
        Ok(Self::new(TemplateLibrary::load(contents_root)?))
    }

    pub fn library(&self) -> &TemplateLibrary {
        &self.library
    }

    /// Render one page from its raw bytes.
    pub fn render(&self, rel: &RelativePath, raw: &[u8]) -> Result<Vec<u8>, RenderError> {
        let name = rel.as_str();
        let text = std::str::from_utf8(raw).map_err(|_| RenderError::Decode {
            name: name.to_string(),
        })?;

        let extracted = extract(text);
        if let Some(err) = &extracted.error {
            tracing::warn!("{}: {}; rendering with empty params", name, err);
        } else if !extracted.params.is_empty() {
            tracing::debug!("{}: params {:?}", name, extracted.params);
        }
        let ctx = to_tera_context(&extracted.params)?;

        let mut tera = self.library.tera().clone();
        tera.add_raw_template(name, extracted.body)
            .map_err(|e| RenderError::TemplateSyntax {
                name: name.to_string(),
                source: e,
            })?;

        let out = tera
            .render(name, &ctx)
            .map_err(|e| RenderError::RenderExecution {
                name: name.to_string(),
                source: e,
            })?;
        Ok(out.into_bytes())
    }

    /// Read `contents_root/rel` and render it.
    ///
    /// A missing source (or a directory in its place) is reported as an
    /// [`RenderError::Io`] with kind `NotFound`; see
    /// [`RenderError::is_missing_source`].
    pub fn render_file(&self, contents_root: &Path, rel: &RelativePath) -> Result<Vec<u8>, RenderError> {
        let path = rel.to_path(contents_root);
        if !path.is_file() {
            return Err(io_err(
                &path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such source file"),
            ));
        }
        let raw = std::fs::read(&path).map_err(|e| io_err(&path, e))?;
        tracing::debug!("loaded {}", rel);
        self.render(rel, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> PageRenderer {
        PageRenderer::new(TemplateLibrary::from_sources(vec![(
            "_parts/header.html".to_string(),
            "<header>{{ title }}</header>".to_string(),
        )]))
    }

    fn render_str(r: &PageRenderer, name: &str, raw: &str) -> Result<String, RenderError> {
        r.render(&RelativePath::from(name), raw.as_bytes())
            .map(|b| String::from_utf8(b).unwrap())
    }

    #[test]
    fn params_become_context() {
        let out = render_str(
            &renderer(),
            "index.html",
            r#"<!--params{"title":"Home"}--><h1>{{ title }}</h1>"#,
        )
        .unwrap();
        assert_eq!(out, "<h1>Home</h1>");
    }

    #[test]
    fn plain_text_without_params_renders_verbatim() {
        let out = render_str(&renderer(), "plain.html", "<p>static</p>\n").unwrap();
        assert_eq!(out, "<p>static</p>\n");
    }

    #[test]
    fn include_resolves_against_library() {
        let out = render_str(
            &renderer(),
            "about/index.html",
            r#"<!--params{"title":"About"}-->{% include "_parts/header.html" %}"#,
        )
        .unwrap();
        assert_eq!(out, "<header>About</header>");
    }

    #[test]
    fn malformed_params_still_render() {
        let out = render_str(&renderer(), "x.html", "<!--params{oops-->ok").unwrap();
        assert_eq!(out, "ok");
    }

    #[test]
    fn syntax_error_is_template_syntax() {
        let err = render_str(&renderer(), "bad.html", "{% if %}").unwrap_err();
        assert!(matches!(err, RenderError::TemplateSyntax { .. }), "got: {err}");
        assert!(err.detail().contains("bad.html"));
    }

    #[test]
    fn undefined_variable_is_execution_error() {
        let err = render_str(&renderer(), "page.html", "{{ missing.field }}").unwrap_err();
        assert!(matches!(err, RenderError::RenderExecution { .. }), "got: {err}");
    }

    #[test]
    fn non_utf8_source_is_decode_error() {
        let err = renderer()
            .render(&RelativePath::from("img.html"), &[0xff, 0xfe, 0x00])
            .unwrap_err();
        assert!(matches!(err, RenderError::Decode { .. }));
    }

    #[test]
    fn html_pages_autoescape_params() {
        let out = render_str(
            &renderer(),
            "esc.html",
            r#"<!--params{"t":"<b>"}-->{{ t }}"#,
        )
        .unwrap();
        assert_eq!(out, "&lt;b&gt;");
    }

    #[test]
    fn missing_file_is_missing_source() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = renderer()
            .render_file(tmp.path(), &RelativePath::from("nope.html"))
            .unwrap_err();
        assert!(err.is_missing_source());
    }

    #[test]
    fn rendering_does_not_mutate_library() {
        let r = renderer();
        render_str(&r, "one.html", "1").unwrap();
        assert!(!r.library().contains(&RelativePath::from("one.html")));
    }
}
