//! Render context built from a page's parameter block.

use crate::error::RenderError;

/// String keys to arbitrary JSON values; the whole render context of a page.
pub type ParameterMap = serde_json::Map<String, serde_json::Value>;

/// Convert a [`ParameterMap`] to a [`tera::Context`].
///
/// Top-level keys become template variables: `{"title": "Home"}` is
/// available as `{{ title }}`.
pub fn to_tera_context(params: &ParameterMap) -> Result<tera::Context, RenderError> {
    tera::Context::from_serialize(params).map_err(RenderError::Context)
}
