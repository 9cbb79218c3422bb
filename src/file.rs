//! Config file discovery and reading.
//!
//! A project keeps its config next to the content as `markata-go.{ext}`. A
//! user-wide config lives in the platform config directory as
//! `config.{ext}` (`~/.config/markata-go/config.toml` on Linux). Extensions
//! are tried in a fixed preference order: `toml`, `yaml`, `yml`, `json`.
//!
//! Discovery never fails. A directory without a config file yields `None`
//! (or no entries), so callers can fall back to defaults.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::ROOT_NAMESPACE;
use crate::error::{ConfigError, Result};
use crate::types::{ConfigSource, Origin};

/// Extensions in preference order.
pub const EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];

const USER_FILE_STEM: &str = "config";

/// Find the preferred project config file in `dir`.
pub fn discover(dir: &Path) -> Option<ConfigSource> {
    let found = candidates(dir, ROOT_NAMESPACE, Origin::Project).next();
    match &found {
        Some(source) => debug!(path = %source.path.display(), "discovered config file"),
        None => debug!(dir = %dir.display(), "no config file found"),
    }
    found
}

/// Every config file visible from the current directory: user files first,
/// then project files. Later entries take precedence when merged.
pub fn discover_all() -> Vec<ConfigSource> {
    let Ok(cwd) = std::env::current_dir() else {
        return Vec::new();
    };
    discover_all_in(&cwd, user_config_dir().as_deref())
}

/// Like [`discover_all`] with explicit directories.
pub fn discover_all_in(project_dir: &Path, user_dir: Option<&Path>) -> Vec<ConfigSource> {
    let mut found = Vec::new();
    if let Some(user_dir) = user_dir {
        found.extend(candidates(user_dir, USER_FILE_STEM, Origin::User));
    }
    found.extend(candidates(project_dir, ROOT_NAMESPACE, Origin::Project));
    found
}

/// The platform config directory for markata-go, if the platform has one.
pub fn user_config_dir() -> Option<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", ROOT_NAMESPACE)?;
    Some(dirs.config_dir().to_path_buf())
}

/// Read a file the caller asked for by name. A missing file is an error here.
///
/// Returns raw bytes; text decoding is left to [`codec::decode`](crate::codec::decode)
/// so invalid UTF-8 is reported as a decode error.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| ConfigError::io(path, e))
}

fn candidates<'a>(
    dir: &'a Path,
    stem: &'a str,
    origin: Origin,
) -> impl Iterator<Item = ConfigSource> + 'a {
    EXTENSIONS
        .iter()
        .map(move |ext| dir.join(format!("{stem}.{ext}")))
        .filter(|path| path.is_file())
        .map(move |path| ConfigSource::new(path, origin))
}
