//! Configuration for the markata-go static site generator: load it, layer it,
//! edit it in place, and check it.
//!
//! A site keeps its settings under a single `markata-go` key in a TOML, YAML
//! or JSON file. This crate finds that file, merges it over compiled-in
//! defaults, applies `MARKATA_GO_*` environment overrides and hands back a
//! typed [`MarkataConfig`].
//!
//! ```no_run
//! let config = markata_go_config::load_discovered()?;
//! println!("writing {} to {}", config.title, config.output_dir);
//! # Ok::<(), markata_go_config::ConfigError>(())
//! ```
//!
//! # Layer precedence
//!
//! ```text
//! Compiled defaults     Default impls on the config structs
//!        ↑ overridden by
//! Config files          base first, then each override file in order
//!        ↑ overridden by
//! Environment vars      MARKATA_GO_<FIELD_PATH>
//! ```
//!
//! Every file layer is **sparse**: it only names the keys it changes.
//! Mappings merge key by key; sequences and scalars are replaced whole, so a
//! later `glob.patterns` list replaces the earlier one rather than extending
//! it. Keys the config does not know are logged at `warn` and ignored.
//!
//! # File formats
//!
//! The format is chosen by extension, case-insensitively: `.yaml`/`.yml` is
//! YAML, `.json` is JSON, and anything else is TOML. All three are decoded
//! into the same [`Value`] tree, so everything downstream is format-blind.
//!
//! ```toml
//! [markata-go]
//! title = "My Site"
//! output_dir = "public"
//!
//! [[markata-go.feeds]]
//! slug = "blog"
//! filter = "published == True"
//! ```
//!
//! Discovery looks for `markata-go.toml`, `markata-go.yaml`,
//! `markata-go.yml` and `markata-go.json`, in that order, in the search
//! directory. When none exists the defaults are used; that is not an error.
//!
//! # Key paths
//!
//! Single values are addressed with dotted paths where a segment may carry
//! one index: `feeds[0].formats.rss`. The leading `markata-go` segment is
//! implied when omitted. Lookups match keys case-insensitively.
//!
//! Reading is strict: a missing key or an index past the end is an error.
//! Writing always succeeds for non-negative indices. Missing mappings are
//! created, sequences are padded, and anything of the wrong shape in the way
//! is replaced. Negative indices are rejected before anything is touched.
//!
//! ```no_run
//! use std::path::Path;
//! use markata_go_config::{persist, Value};
//!
//! let path = Path::new("markata-go.json");
//! persist::set_value_in_file(path, "feeds[0].formats.rss", Value::Bool(true))?;
//! # Ok::<(), markata_go_config::ConfigError>(())
//! ```
//!
//! Edits rewrite the whole file in its own format. Comments and key order
//! are not kept; permission bits are.
//!
//! # Environment variables
//!
//! Each overridable field has a variable named after its path:
//!
//! | Env var | Config key |
//! |---------|------------|
//! | `MARKATA_GO_OUTPUT_DIR` | `output_dir` |
//! | `MARKATA_GO_GLOB_PATTERNS` | `glob.patterns` |
//! | `MARKATA_GO_FEED_DEFAULTS_ITEMS_PER_PAGE` | `feed_defaults.items_per_page` |
//!
//! Lists are comma-separated; booleans accept `true/1/yes` and `false/0/no`.
//! A value that does not parse for its field is logged and skipped. Tests
//! and embedders can swap the process environment for a `HashMap` through
//! [`ConfigLoader::env`], or turn overrides off with
//! [`ConfigLoader::no_env`].
//!
//! # Validation
//!
//! [`validate::validate`] runs semantic checks (URL shape, non-negative
//! counts, feeds with no output) and returns [`ValidationFinding`]s rather
//! than failing. Errors are listed before warnings.
//!
//! # Error handling
//!
//! All fallible operations return [`ConfigError`]. Messages name the file or
//! key path involved. See the [`error`] module for the full set.

pub mod access;
pub mod codec;
pub mod config;
pub mod env;
pub mod error;
pub mod file;
pub mod keypath;
pub mod merge;
pub mod persist;
pub mod types;
pub mod validate;
pub mod value;

mod builder;
mod flatten;
mod ops;
mod resolve;

#[cfg(test)]
mod fixtures;
#[cfg(test)]
mod proptests;

use std::path::{Path, PathBuf};

pub use builder::ConfigLoader;
pub use config::{MarkataConfig, ROOT_NAMESPACE};
pub use env::{EnvSource, ProcessEnv};
pub use error::{ConfigError, Result};
pub use keypath::{KeyPath, KeySegment};
pub use ops::{ConfigResult, parse_raw_value};
pub use types::{ConfigAction, ConfigSource, Format, Origin};
pub use validate::{Severity, ValidationFinding};
pub use value::{Mapping, Value};

/// Load `path` over the defaults, with process environment overrides.
pub fn load(path: &Path) -> Result<MarkataConfig> {
    ConfigLoader::new().load(path)
}

/// Load `base` and then `overrides` in order, with process environment
/// overrides. An empty `base` path skips the base layer.
pub fn load_with_merge(base: &Path, overrides: &[PathBuf]) -> Result<MarkataConfig> {
    ConfigLoader::new().load_with_merge(base, overrides)
}

/// Load the config file in the current directory, or the defaults if there
/// is none.
pub fn load_discovered() -> Result<MarkataConfig> {
    ConfigLoader::new().load_discovered()
}
