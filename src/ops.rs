//! Config operations: raw value parsing, listing, and result types.
//!
//! Provides the logic behind `get`, `set` and `list`, and the `ConfigResult`
//! enum that callers use to display results.

use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::flatten;
use crate::value::Value;

/// Result of a config operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigResult {
    /// The value found at a key.
    KeyValue { key: String, value: Value },
    /// Confirmation that a value was written.
    ValueSet { key: String, value: Value },
    /// All resolved configuration key-value pairs.
    Listing { entries: Vec<(String, String)> },
}

impl fmt::Display for ConfigResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigResult::KeyValue { key, value } => write!(f, "{key} = {value}"),
            ConfigResult::ValueSet { key, value } => write!(f, "Set {key} = {value}"),
            ConfigResult::Listing { entries } => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                Ok(())
            }
        }
    }
}

/// Interpret a value typed on a command line.
///
/// `null`, `true` and `false` are themselves. Text that parses as an integer
/// is an integer; text with a `.` that parses as a float is a float. A JSON
/// array or object literal is decoded as such. Anything else is a string.
pub fn parse_raw_value(raw: &str) -> Value {
    match raw {
        "null" => return Value::Null,
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Integer(i);
    }
    if raw.contains('.')
        && let Ok(f) = raw.parse::<f64>()
    {
        return Value::Float(f);
    }
    if (raw.starts_with('[') || raw.starts_with('{'))
        && let Ok(json) = serde_json::from_str::<serde_json::Value>(raw)
    {
        return Value::from(json);
    }
    Value::String(raw.to_string())
}

/// List all values of `config` as flattened dotted key-value pairs.
pub fn list_values<S: Serialize>(config: &S) -> Result<ConfigResult> {
    let entries = flatten::flatten(config)?
        .into_iter()
        .map(|(key, value)| {
            let display = match value {
                Some(v) => v.to_string(),
                None => "<not set>".to_string(),
            };
            (key, display)
        })
        .collect();

    Ok(ConfigResult::Listing { entries })
}
