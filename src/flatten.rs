//! Flatten any `Serialize` value into dotted key-value pairs.
//!
//! The value is serialized through `serde_json` first, so keys come out in
//! sorted order and anything serde can describe is supported. Mappings are
//! recursed into; sequences are leaves.

use serde::Serialize;

use crate::error::{ConfigError, Result};
use crate::value::Value;

/// Flatten `source` into `(dotted.key, value)` pairs.
///
/// `None` fields come out as `(key, None)`. Empty mappings produce no entries.
///
/// `Outer { feed_defaults: Inner { items_per_page: 10 } }` becomes
/// `[("feed_defaults.items_per_page", Some(Integer(10)))]`.
pub fn flatten<S: Serialize>(source: &S) -> Result<Vec<(String, Option<Value>)>> {
    let json = serde_json::to_value(source).map_err(|e| ConfigError::InvalidValue {
        key: String::new(),
        reason: e.to_string(),
    })?;
    let mut out = Vec::new();
    walk(String::new(), json, &mut out);
    Ok(out)
}

fn walk(prefix: String, json: serde_json::Value, out: &mut Vec<(String, Option<Value>)>) {
    match json {
        serde_json::Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key
                } else {
                    format!("{prefix}.{key}")
                };
                walk(path, child, out);
            }
        }
        serde_json::Value::Null => out.push((prefix, None)),
        other => out.push((prefix, Some(Value::from(other)))),
    }
}
