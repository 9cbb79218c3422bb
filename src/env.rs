//! Environment variable overrides for [`MarkataConfig`].
//!
//! Each overridable field has one entry in a static table: its path in the
//! config tree and how to coerce the variable's text. The variable name is
//! [`ENV_PREFIX`] followed by the upper-cased, `_`-joined path:
//!
//! | Env var | Field |
//! |---------|-------|
//! | `MARKATA_GO_OUTPUT_DIR` | `output_dir` |
//! | `MARKATA_GO_GLOB_PATTERNS` | `glob.patterns` |
//! | `MARKATA_GO_FEED_DEFAULTS_ITEMS_PER_PAGE` | `feed_defaults.items_per_page` |
//!
//! `FEEDS_DEFAULTS` is accepted as a historical spelling of `FEED_DEFAULTS`;
//! when both are set the canonical name wins.
//!
//! Coercion is best-effort. A value that doesn't parse for its field leaves
//! the field as it was and logs a warning; it never fails the load.
//!
//! The environment is reached through [`EnvSource`] so tests can pass a
//! `HashMap` instead of touching the process environment.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::MarkataConfig;
use crate::error::Result;
use crate::flatten;

pub const ENV_PREFIX: &str = "MARKATA_GO_";

const FEED_DEFAULTS_ALIAS: &str = "FEEDS_DEFAULTS";

/// Read and write access to an environment variable table.
pub trait EnvSource {
    fn var(&self, name: &str) -> Option<String>;
    fn set_var(&mut self, name: &str, value: &str);
    fn remove_var(&mut self, name: &str);
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn set_var(&mut self, name: &str, value: &str) {
        // SAFETY: callers of `set_override`/`unset_override` on `ProcessEnv`
        // must ensure no other thread reads or writes the environment at the
        // same time. That includes C code linked into the host (`getenv` in
        // libc, DNS resolution, locale setup), which `std::env`'s lock does not
        // cover.
        unsafe { std::env::set_var(name, value) }
    }

    fn remove_var(&mut self, name: &str) {
        // SAFETY: see `set_var`.
        unsafe { std::env::remove_var(name) }
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }

    fn set_var(&mut self, name: &str, value: &str) {
        self.insert(name.to_string(), value.to_string());
    }

    fn remove_var(&mut self, name: &str) {
        self.remove(name);
    }
}

enum Field {
    Str(fn(&mut MarkataConfig) -> &mut String),
    OptStr(fn(&mut MarkataConfig) -> &mut Option<String>),
    Int(fn(&mut MarkataConfig) -> &mut i64),
    Bool(fn(&mut MarkataConfig) -> &mut bool),
    List(fn(&mut MarkataConfig) -> &mut Vec<String>),
}

struct EnvField {
    path: &'static [&'static str],
    field: Field,
}

static FIELDS: &[EnvField] = &[
    EnvField {
        path: &["output_dir"],
        field: Field::Str(|c| &mut c.output_dir),
    },
    EnvField {
        path: &["url"],
        field: Field::Str(|c| &mut c.url),
    },
    EnvField {
        path: &["title"],
        field: Field::Str(|c| &mut c.title),
    },
    EnvField {
        path: &["description"],
        field: Field::Str(|c| &mut c.description),
    },
    EnvField {
        path: &["author"],
        field: Field::Str(|c| &mut c.author),
    },
    EnvField {
        path: &["assets_dir"],
        field: Field::Str(|c| &mut c.assets_dir),
    },
    EnvField {
        path: &["templates_dir"],
        field: Field::Str(|c| &mut c.templates_dir),
    },
    EnvField {
        path: &["hooks"],
        field: Field::List(|c| &mut c.hooks),
    },
    EnvField {
        path: &["disabled_hooks"],
        field: Field::List(|c| &mut c.disabled_hooks),
    },
    EnvField {
        path: &["concurrency"],
        field: Field::Int(|c| &mut c.concurrency),
    },
    EnvField {
        path: &["glob", "patterns"],
        field: Field::List(|c| &mut c.glob.patterns),
    },
    EnvField {
        path: &["glob", "use_gitignore"],
        field: Field::Bool(|c| &mut c.glob.use_gitignore),
    },
    EnvField {
        path: &["markdown", "extensions"],
        field: Field::List(|c| &mut c.markdown.extensions),
    },
    EnvField {
        path: &["encryption", "enabled"],
        field: Field::Bool(|c| &mut c.encryption.enabled),
    },
    EnvField {
        path: &["encryption", "default_key"],
        field: Field::Str(|c| &mut c.encryption.default_key),
    },
    EnvField {
        path: &["encryption", "decryption_hint"],
        field: Field::Str(|c| &mut c.encryption.decryption_hint),
    },
    EnvField {
        path: &["blogroll", "enabled"],
        field: Field::Bool(|c| &mut c.blogroll.enabled),
    },
    EnvField {
        path: &["blogroll", "cache_dir"],
        field: Field::Str(|c| &mut c.blogroll.cache_dir),
    },
    EnvField {
        path: &["feed_defaults", "items_per_page"],
        field: Field::Int(|c| &mut c.feed_defaults.items_per_page),
    },
    EnvField {
        path: &["feed_defaults", "orphan_threshold"],
        field: Field::Int(|c| &mut c.feed_defaults.orphan_threshold),
    },
    EnvField {
        path: &["feed_defaults", "formats", "html"],
        field: Field::Bool(|c| &mut c.feed_defaults.formats.html),
    },
    EnvField {
        path: &["feed_defaults", "formats", "rss"],
        field: Field::Bool(|c| &mut c.feed_defaults.formats.rss),
    },
    EnvField {
        path: &["feed_defaults", "formats", "atom"],
        field: Field::Bool(|c| &mut c.feed_defaults.formats.atom),
    },
    EnvField {
        path: &["feed_defaults", "formats", "json"],
        field: Field::Bool(|c| &mut c.feed_defaults.formats.json),
    },
    EnvField {
        path: &["feed_defaults", "formats", "markdown"],
        field: Field::Bool(|c| &mut c.feed_defaults.formats.markdown),
    },
    EnvField {
        path: &["feed_defaults", "formats", "text"],
        field: Field::Bool(|c| &mut c.feed_defaults.formats.text),
    },
    EnvField {
        path: &["feed_defaults", "templates", "html"],
        field: Field::OptStr(|c| &mut c.feed_defaults.templates.html),
    },
    EnvField {
        path: &["feed_defaults", "templates", "rss"],
        field: Field::OptStr(|c| &mut c.feed_defaults.templates.rss),
    },
    EnvField {
        path: &["feed_defaults", "templates", "atom"],
        field: Field::OptStr(|c| &mut c.feed_defaults.templates.atom),
    },
    EnvField {
        path: &["feed_defaults", "templates", "json"],
        field: Field::OptStr(|c| &mut c.feed_defaults.templates.json),
    },
    EnvField {
        path: &["feed_defaults", "templates", "card"],
        field: Field::OptStr(|c| &mut c.feed_defaults.templates.card),
    },
];

impl EnvField {
    fn var_name(&self) -> String {
        format!("{ENV_PREFIX}{}", self.path.join("_").to_uppercase())
    }

    fn alias_name(&self) -> Option<String> {
        match self.path.split_first() {
            Some((&"feed_defaults", rest)) => Some(format!(
                "{ENV_PREFIX}{FEED_DEFAULTS_ALIAS}_{}",
                rest.join("_").to_uppercase()
            )),
            _ => None,
        }
    }

    /// Coerce `raw` into the field. Returns `false` if it didn't parse.
    fn apply(&self, config: &mut MarkataConfig, raw: &str) -> bool {
        match self.field {
            Field::Str(get) => *get(config) = raw.to_string(),
            Field::OptStr(get) => *get(config) = Some(raw.to_string()),
            Field::Int(get) => match parse_int(raw) {
                Some(i) => *get(config) = i,
                None => return false,
            },
            Field::Bool(get) => match parse_bool(raw) {
                Some(b) => *get(config) = b,
                None => return false,
            },
            Field::List(get) => *get(config) = parse_list(raw),
        }
        true
    }
}

/// Apply every recognized `MARKATA_GO_*` variable in `env` to `config`.
///
/// Returns the number of fields changed.
pub fn apply_overrides<E: EnvSource + ?Sized>(config: &mut MarkataConfig, env: &E) -> usize {
    let mut applied = 0;
    for field in FIELDS {
        let name = field.var_name();
        let found = match env.var(&name) {
            Some(raw) => Some((name, raw)),
            None => field
                .alias_name()
                .and_then(|alias| env.var(&alias).map(|raw| (alias, raw))),
        };
        let Some((name, raw)) = found else {
            continue;
        };

        if field.apply(config, &raw) {
            debug!(var = %name, "applied environment override");
            applied += 1;
        } else {
            warn!(var = %name, value = %raw, "ignoring unparsable environment override");
        }
    }
    applied
}

/// Read a single override by its un-prefixed key, e.g. `"concurrency"` or
/// `"feed_defaults.items_per_page"`.
pub fn get_override<E: EnvSource + ?Sized>(env: &E, key: &str) -> Option<String> {
    env.var(&env_var_for_key(key))
}

/// Set an override through `env`. Intended for tooling and tests.
///
/// With [`ProcessEnv`] this mutates the process environment. Only call it
/// while no other thread may be reading the environment, including through
/// C libraries linked into the host.
pub fn set_override<E: EnvSource + ?Sized>(env: &mut E, key: &str, value: &str) {
    env.set_var(&env_var_for_key(key), value);
}

/// Remove an override through `env`. Intended for tooling and tests.
///
/// Carries the same threading restriction as [`set_override`] for
/// [`ProcessEnv`].
pub fn unset_override<E: EnvSource + ?Sized>(env: &mut E, key: &str) {
    env.remove_var(&env_var_for_key(key));
}

/// Every variable name [`apply_overrides`] recognizes, aliases excluded.
pub fn override_var_names() -> Vec<String> {
    FIELDS.iter().map(EnvField::var_name).collect()
}

/// Variable names for every leaf of `T`, for documentation.
///
/// Walks the serialized default value of `T`, so only what the default
/// actually contains is expanded:
///
/// - a sequence (including a sequence of structs) is a single leaf;
/// - an `Option<Struct>` that defaults to `None` is a single leaf too, e.g.
///   `FeedConfig::formats` yields `MARKATA_GO_FORMATS` and none of the
///   per-format names.
pub fn expected_env_vars<T: Serialize + Default>() -> Result<Vec<String>> {
    let pairs = flatten::flatten(&T::default())?;
    Ok(pairs
        .into_iter()
        .map(|(key, _)| env_var_for_key(&key))
        .collect())
}

fn env_var_for_key(key: &str) -> String {
    format!("{ENV_PREFIX}{}", key.replace('.', "_").to_uppercase())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn parse_int(s: &str) -> Option<i64> {
    s.parse::<i64>().ok()
}

/// Comma-separated, trimmed, empty items dropped. `""` is an empty list.
fn parse_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}
