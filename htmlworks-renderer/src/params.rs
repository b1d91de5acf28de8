//! Parameter block extraction.
//!
//! A page may embed its render context as JSON between `<!--params` and the
//! next `-->`:
//!
//! ```text
//! <!--params{"title":"Home"}-->
//! <h1>{{ title }}</h1>
//! ```
//!
//! Once a complete block is found, everything up to and including `-->` is
//! removed from the body. Without a complete block the text is untouched.

use crate::context::ParameterMap;
use crate::error::ParamParseError;

pub const PARAM_START: &str = "<!--params";
pub const PARAM_END: &str = "-->";

/// Output of [`extract`].
#[derive(Debug)]
pub struct Extracted<'a> {
    /// Parsed block, or empty when absent or malformed.
    pub params: ParameterMap,
    /// Template body with the block removed.
    pub body: &'a str,
    /// Set only when a complete block held invalid JSON.
    pub error: Option<ParamParseError>,
}

/// Split `raw` into its parameter map and remaining template body.
pub fn extract(raw: &str) -> Extracted<'_> {
    let untouched = || Extracted {
        params: ParameterMap::new(),
        body: raw,
        error: None,
    };

    let Some(start) = raw.find(PARAM_START) else {
        return untouched();
    };
    let json_start = start + PARAM_START.len();
    let Some(len) = raw[json_start..].find(PARAM_END) else {
        return untouched();
    };
    let json_end = json_start + len;
    let body = &raw[json_end + PARAM_END.len()..];

    match serde_json::from_str::<ParameterMap>(&raw[json_start..json_end]) {
        Ok(params) => Extracted {
            params,
            body,
            error: None,
        },
        Err(e) => Extracted {
            params: ParameterMap::new(),
            body,
            error: Some(ParamParseError(e)),
        },
    }
}
