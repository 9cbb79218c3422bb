//! Read and write a [`Value`] tree by [`KeyPath`].
//!
//! Reads are strict: a missing key, a non-sequence under an index, or an index
//! past the end all fail. Writes succeed for any index from `0` to
//! [`MAX_INDEX`]; larger indices are rejected rather than padding a sequence
//! with millions of nulls.
//! Anything in the way that has the wrong shape is replaced, so setting
//! `feeds[2].title` on a document where `feeds` is a string discards that
//! string. Writes favor a successful edit over preserving mismatched data.
//!
//! Key lookups prefer an exact match and fall back to a case-insensitive one;
//! a write to an existing key keeps that key's spelling.

use crate::error::{ConfigError, Result};
use crate::keypath::{self, KeyPath, KeySegment};
use crate::value::{Mapping, Value};

/// Largest index [`set`] will write to.
pub const MAX_INDEX: i64 = 65_535;

/// Look up the value at `path`.
pub fn get<'a>(doc: &'a Value, path: &KeyPath) -> Result<&'a Value> {
    let segments = path.segments();
    let mut current = doc;

    for (depth, segment) in segments.iter().enumerate() {
        let shown = || keypath::render(&segments[..=depth]);

        let map = current
            .as_mapping()
            .ok_or_else(|| ConfigError::KeyNotFound(shown()))?;
        let found = lookup(map, &segment.key).ok_or_else(|| ConfigError::KeyNotFound(shown()))?;

        current = match segment.index {
            None => found,
            Some(index) => {
                let items = found.as_sequence().ok_or_else(|| ConfigError::TypeMismatch {
                    key: prefixed(&segments[..depth], &segment.key),
                    found: found.kind(),
                })?;
                if index < 0 || index as usize >= items.len() {
                    return Err(ConfigError::IndexOutOfRange {
                        key: prefixed(&segments[..depth], &segment.key),
                        index,
                        len: items.len(),
                    });
                }
                &items[index as usize]
            }
        };
    }

    Ok(current)
}

/// Write `value` at `path` and return the updated document.
///
/// A non-mapping `doc` is replaced by an empty mapping first. Fails only when
/// a segment carries a negative index or one above [`MAX_INDEX`]; that check
/// runs before anything is modified.
pub fn set(doc: Value, path: &KeyPath, value: Value) -> Result<Value> {
    let segments = path.segments();
    if segments.is_empty() {
        return Err(ConfigError::InvalidKeyPath {
            path: String::new(),
            reason: "path is empty".into(),
        });
    }
    for (depth, segment) in segments.iter().enumerate() {
        if let Some(index) = segment.index
            && !(0..=MAX_INDEX).contains(&index)
        {
            return Err(ConfigError::IndexOutOfRange {
                key: prefixed(&segments[..depth], &segment.key),
                index,
                len: 0,
            });
        }
    }

    let mut root = match doc {
        Value::Mapping(map) => map,
        _ => Mapping::new(),
    };
    set_in(&mut root, segments, value);
    Ok(Value::Mapping(root))
}

fn set_in(map: &mut Mapping, segments: &[KeySegment], value: Value) {
    let Some((segment, rest)) = segments.split_first() else {
        return;
    };
    let key = existing_key(map, &segment.key).unwrap_or_else(|| segment.key.clone());
    let slot = map.entry(key).or_insert(Value::Null);

    // Indices were checked against `0..=MAX_INDEX` by `set`.
    let index = segment.index.map(|i| i as usize);

    match (rest.is_empty(), index) {
        (true, None) => *slot = value,
        (true, Some(index)) => {
            let items = coerce_sequence(slot);
            if items.len() <= index {
                items.resize(index + 1, Value::Null);
            }
            items[index] = value;
        }
        (false, None) => set_in(coerce_mapping(slot), rest, value),
        (false, Some(index)) => {
            let items = coerce_sequence(slot);
            if items.len() <= index {
                items.resize(index + 1, Value::mapping());
            }
            set_in(coerce_mapping(&mut items[index]), rest, value);
        }
    }
}

fn coerce_mapping(slot: &mut Value) -> &mut Mapping {
    if !matches!(slot, Value::Mapping(_)) {
        *slot = Value::mapping();
    }
    match slot {
        Value::Mapping(map) => map,
        _ => unreachable!("slot was just replaced with a mapping"),
    }
}

fn coerce_sequence(slot: &mut Value) -> &mut Vec<Value> {
    if !matches!(slot, Value::Sequence(_)) {
        *slot = Value::Sequence(Vec::new());
    }
    match slot {
        Value::Sequence(items) => items,
        _ => unreachable!("slot was just replaced with a sequence"),
    }
}

/// Find a key exactly, then case-insensitively.
pub(crate) fn lookup<'a>(map: &'a Mapping, key: &str) -> Option<&'a Value> {
    match map.get(key) {
        Some(v) => Some(v),
        None => existing_key(map, key).and_then(|k| map.get(&k)),
    }
}

fn existing_key(map: &Mapping, key: &str) -> Option<String> {
    if map.contains_key(key) {
        return Some(key.to_string());
    }
    map.keys().find(|k| k.eq_ignore_ascii_case(key)).cloned()
}

fn prefixed(parents: &[KeySegment], key: &str) -> String {
    if parents.is_empty() {
        key.to_string()
    } else {
        format!("{}.{key}", keypath::render(parents))
    }
}
