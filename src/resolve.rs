//! Core resolution pipeline: merge all config layers and produce a typed config.
//!
//! Operates on pre-loaded data (`ResolveInput`) with no file I/O, so the whole
//! pipeline is testable with synthetic inputs. Steps:
//!
//! 1. Start from the compiled-in defaults, as a [`Value`] tree
//! 2. Decode each file in its own format
//! 3. Take the `markata-go` section (matched case-insensitively)
//! 4. Deep-merge it on top (later files override earlier)
//! 5. Deserialize the merged tree into [`MarkataConfig`]
//! 6. Apply `MARKATA_GO_*` environment overrides

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::access;
use crate::codec;
use crate::config::{MarkataConfig, ROOT_NAMESPACE};
use crate::env::{self, EnvSource};
use crate::error::{ConfigError, Result};
use crate::merge::deep_merge;
use crate::types::Format;
use crate::value::{Mapping, Value};

/// All pre-loaded data needed to resolve a config.
pub struct ResolveInput<'a> {
    /// Raw file contents in precedence order: first = lowest priority, last =
    /// highest. The format of each is taken from its path's extension.
    pub files: Vec<(PathBuf, Vec<u8>)>,
    /// Environment to read overrides from. `None` disables overrides.
    pub env: Option<&'a dyn EnvSource>,
}

pub fn resolve(input: ResolveInput<'_>) -> Result<MarkataConfig> {
    let mut merged = defaults()?;

    for (path, content) in &input.files {
        let format = Format::from_path(path);
        let doc = codec::decode(format, content, path)?;
        let Some(section) = namespace(doc)? else {
            warn!(path = %path.display(), "config file has no [{ROOT_NAMESPACE}] section");
            continue;
        };
        merged = deep_merge(merged, section);
        debug!(path = %path.display(), %format, "merged config layer");
    }

    let mut config = from_value(merged)?;

    if let Some(source) = input.env {
        let applied = env::apply_overrides(&mut config, source);
        debug!(applied, "applied environment overrides");
    }

    Ok(config)
}

/// The compiled-in defaults as a mapping.
pub fn defaults() -> Result<Mapping> {
    let json = serde_json::to_value(MarkataConfig::default()).map_err(|e| {
        ConfigError::InvalidValue {
            key: ROOT_NAMESPACE.into(),
            reason: e.to_string(),
        }
    })?;
    match Value::from(json) {
        Value::Mapping(map) => Ok(map),
        other => Err(ConfigError::InvalidValue {
            key: ROOT_NAMESPACE.into(),
            reason: format!("defaults serialized to {}", other.kind()),
        }),
    }
}

/// Pull the `markata-go` section out of a decoded document.
fn namespace(doc: Value) -> Result<Option<Mapping>> {
    let Some(root) = doc.as_mapping() else {
        return Err(ConfigError::InvalidValue {
            key: ROOT_NAMESPACE.into(),
            reason: format!("document root must be a mapping, found {}", doc.kind()),
        });
    };
    match access::lookup(root, ROOT_NAMESPACE) {
        None => Ok(None),
        Some(Value::Mapping(section)) => Ok(Some(section.clone())),
        Some(other) => Err(ConfigError::InvalidValue {
            key: ROOT_NAMESPACE.into(),
            reason: format!("expected a mapping, found {}", other.kind()),
        }),
    }
}

/// Deserialize a merged tree, warning about keys the config doesn't know.
fn from_value(merged: Mapping) -> Result<MarkataConfig> {
    let json = serde_json::Value::from(&Value::Mapping(merged));
    let mut unknown = Vec::new();
    let config: MarkataConfig =
        serde_ignored::deserialize(json, |path| unknown.push(path.to_string())).map_err(
            |e: serde_json::Error| ConfigError::InvalidValue {
                key: ROOT_NAMESPACE.into(),
                reason: e.to_string(),
            },
        )?;
    for key in unknown {
        warn!(%key, "ignoring unknown config key");
    }
    Ok(config)
}
