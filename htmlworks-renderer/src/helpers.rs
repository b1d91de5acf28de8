//! Functions and filters available to every template.
//!
//! | Name               | Kind     | Example                                  |
//! |--------------------|----------|------------------------------------------|
//! | `repeat(s, n)`     | function | `{{ repeat(s="-", n=3) }}` → `---`       |
//! | `repeat(n)`        | filter   | `{{ "ab" \| repeat(n=2) }}` → `abab`     |
//! | `now(format)`      | function | `{{ now(format="%Y") }}` → `2026`        |

use std::collections::HashMap;

use chrono::format::{Item, StrftimeItems};
use chrono::Local;
use tera::{Tera, Value};

/// Default `now()` layout.
pub const DEFAULT_NOW_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Install every helper on `tera`.
pub fn register(tera: &mut Tera) {
    tera.register_function("repeat", repeat_function);
    tera.register_filter("repeat", repeat_filter);
    tera.register_function("now", now_function);
}

fn repeat_function(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = match args.get("s") {
        Some(Value::String(s)) => s,
        Some(other) => return Err(tera::Error::msg(format!("repeat: `s` must be a string, got {other}"))),
        None => return Err(tera::Error::msg("repeat: missing argument `s`")),
    };
    let n = repeat_count(args)?;
    Ok(Value::String(s.repeat(n)))
}

fn repeat_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let n = repeat_count(args)?;
    Ok(Value::String(s.repeat(n)))
}

fn repeat_count(args: &HashMap<String, Value>) -> tera::Result<usize> {
    let raw = args
        .get("n")
        .ok_or_else(|| tera::Error::msg("repeat: missing argument `n`"))?;
    raw.as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| tera::Error::msg(format!("repeat: `n` must be a non-negative integer, got {raw}")))
}

fn now_function(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let format = match args.get("format") {
        None => DEFAULT_NOW_FORMAT,
        Some(Value::String(f)) if f.is_empty() => DEFAULT_NOW_FORMAT,
        Some(Value::String(f)) => f.as_str(),
        Some(other) => return Err(tera::Error::msg(format!("now: `format` must be a string, got {other}"))),
    };
    // Formatting an invalid pattern panics inside chrono's Display impl.
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|i| matches!(i, Item::Error)) {
        return Err(tera::Error::msg(format!("now: invalid format `{format}`")));
    }
    Ok(Value::String(
        Local::now().format_with_items(items.into_iter()).to_string(),
    ))
}
