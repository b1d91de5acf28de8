//! Request path → content file mapping.
//!
//! The leading `/` is stripped; a path ending in `/` gets `index.html`
//! appended. Paths that could escape the content root or reach hidden files
//! (`..`, `.git`, empty segments, backslashes) map to nothing and are
//! answered with 404.

use std::path::Path;

use htmlworks_core::RelativePath;

/// Map a request path to the content file that renders it.
pub fn to_relative_path(uri_path: &str) -> Option<RelativePath> {
    let decoded = urlencoding::decode(uri_path).ok()?;
    let mut rel = decoded.strip_prefix('/').unwrap_or(&decoded).to_string();
    if decoded.ends_with('/') {
        rel.push_str("index.html");
    }

    let safe = rel
        .split('/')
        .all(|seg| !seg.is_empty() && !seg.starts_with('.') && !seg.contains('\\'));
    safe.then(|| RelativePath::from(rel))
}

/// Guess the response content type from the file extension.
pub fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("xml") => "application/xml; charset=utf-8",
        Some("txt") => "text/plain; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}
