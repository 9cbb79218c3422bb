//! Decode and encode config documents in TOML, YAML or JSON.
//!
//! Every format goes through its own `Value` type and is converted into the
//! crate's [`Value`] tree. Whitespace-only input decodes to an empty mapping
//! in every format, so a freshly created file behaves like `{}`.

use std::path::Path;

use crate::error::{ConfigError, Result};
use crate::types::Format;
use crate::value::{self, Value};

/// Decode `bytes` in `format`. `path` only labels errors.
pub fn decode(format: Format, bytes: &[u8], path: &Path) -> Result<Value> {
    let decode_err = |reason: String| ConfigError::Decode {
        path: path.to_path_buf(),
        format,
        reason,
    };

    let text = std::str::from_utf8(bytes).map_err(|e| decode_err(e.to_string()))?;
    if text.trim().is_empty() {
        return Ok(Value::mapping());
    }

    match format {
        Format::Toml => {
            let table: toml::Table = toml::from_str(text).map_err(|e| decode_err(e.to_string()))?;
            Ok(Value::from(table))
        }
        Format::Yaml => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(text).map_err(|e| decode_err(e.to_string()))?;
            Ok(Value::from(yaml))
        }
        Format::Json => {
            let json: serde_json::Value =
                serde_json::from_str(text).map_err(|e| decode_err(e.to_string()))?;
            Ok(Value::from(json))
        }
    }
}

/// Encode `value` in `format`.
///
/// JSON is pretty-printed with two-space indentation and a trailing newline.
/// TOML needs a mapping at the root and cannot hold null array elements.
pub fn encode(format: Format, value: &Value) -> Result<Vec<u8>> {
    let encode_err = |reason: String| ConfigError::Encode { format, reason };

    match format {
        Format::Toml => {
            let map = value.as_mapping().ok_or_else(|| {
                encode_err(format!("document root must be a table, found {}", value.kind()))
            })?;
            let table = value::to_toml_table(map).map_err(encode_err)?;
            let text = toml::to_string(&table).map_err(|e| encode_err(e.to_string()))?;
            Ok(text.into_bytes())
        }
        Format::Yaml => {
            let yaml = serde_yaml::Value::from(value);
            let text = serde_yaml::to_string(&yaml).map_err(|e| encode_err(e.to_string()))?;
            Ok(text.into_bytes())
        }
        Format::Json => {
            let json = serde_json::Value::from(value);
            let mut text =
                serde_json::to_string_pretty(&json).map_err(|e| encode_err(e.to_string()))?;
            text.push('\n');
            Ok(text.into_bytes())
        }
    }
}
