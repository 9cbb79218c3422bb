//! Read and edit single values in config files.
//!
//! Edits decode the whole document, change one value, re-encode it in the
//! same format and write it back. Comments and key order are not preserved.
//! The file's permission bits are. The write replaces the file in place, so a
//! crash mid-write can leave it truncated.
//!
//! Key paths are relative to the `markata-go` section: `feeds[0].slug` and
//! `markata-go.feeds[0].slug` address the same value.
//!
//! TOML has no null, which limits edits to `.toml` files:
//!
//! - Writing past the end of a list pads it with nulls, so the edit fails with
//!   [`ConfigError::Encode`] unless it fills the next free slot. YAML and JSON
//!   keep the padding as `null`.
//! - Setting a key to [`Value::Null`] removes that key from the file.
//!
//! A failed edit never touches the file.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::access;
use crate::codec;
use crate::error::{ConfigError, Result};
use crate::keypath::KeyPath;
use crate::types::Format;
use crate::value::Value;

/// Pure function: read the value at `key` from a document's raw bytes.
///
/// `path` picks the format and labels errors; nothing is read from disk.
pub fn get_in_document(content: &[u8], path: &Path, key: &str) -> Result<Value> {
    let key_path = KeyPath::parse(key)?.with_root_namespace();
    let doc = codec::decode(Format::from_path(path), content, path)?;
    access::get(&doc, &key_path).cloned()
}

/// Pure function: set `key` to `value` in a document's raw bytes and return
/// the re-encoded document.
///
/// `path` picks the format and labels errors; nothing is read from disk.
pub fn set_in_document(content: &[u8], path: &Path, key: &str, value: Value) -> Result<Vec<u8>> {
    let key_path = KeyPath::parse(key)?.with_root_namespace();
    let format = Format::from_path(path);
    let doc = codec::decode(format, content, path)?;
    let doc = access::set(doc, &key_path, value)?;
    codec::encode(format, &doc)
}

/// Read the value at `key` from the file at `path`.
pub fn get_value_in_file(path: &Path, key: &str) -> Result<Value> {
    let content = crate::file::read_file(path)?;
    get_in_document(&content, path, key)
}

/// Set `key` to `value` in the file at `path`.
///
/// A missing file is treated as an empty document and created, along with any
/// missing parent directories. An existing file keeps its permission bits.
pub fn set_value_in_file(path: &Path, key: &str, value: Value) -> Result<()> {
    let (content, permissions) = match fs::read(path) {
        Ok(content) => {
            let meta = fs::metadata(path).map_err(|e| ConfigError::io(path, e))?;
            (content, Some(meta.permissions()))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => (Vec::new(), None),
        Err(e) => return Err(ConfigError::io(path, e)),
    };

    let bytes = set_in_document(&content, path, key, value)?;

    if permissions.is_none()
        && let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
    }
    fs::write(path, bytes).map_err(|e| ConfigError::io(path, e))?;
    if let Some(permissions) = permissions {
        fs::set_permissions(path, permissions).map_err(|e| ConfigError::io(path, e))?;
    }

    debug!(path = %path.display(), %key, "wrote config value");
    Ok(())
}
