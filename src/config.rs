//! The typed markata-go configuration.
//!
//! Every struct is `#[serde(default)]`, so any subset of keys deserializes and
//! the `Default` impls are the compiled-in defaults layer.

use serde::{Deserialize, Serialize};

/// Key wrapping all settings in a config file.
pub const ROOT_NAMESPACE: &str = "markata-go";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkataConfig {
    /// Directory the built site is written to.
    pub output_dir: String,
    /// Canonical base URL of the site.
    pub url: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub assets_dir: String,
    pub templates_dir: String,
    /// Plugin hooks to run.
    pub hooks: Vec<String>,
    pub disabled_hooks: Vec<String>,
    /// Worker count. `0` picks one per CPU.
    pub concurrency: i64,
    pub glob: GlobConfig,
    pub markdown: MarkdownConfig,
    pub encryption: EncryptionConfig,
    pub blogroll: BlogrollConfig,
    pub feed_defaults: FeedDefaults,
    pub feeds: Vec<FeedConfig>,
}

impl Default for MarkataConfig {
    fn default() -> Self {
        MarkataConfig {
            output_dir: "output".into(),
            url: String::new(),
            title: String::new(),
            description: String::new(),
            author: String::new(),
            assets_dir: "static".into(),
            templates_dir: "templates".into(),
            hooks: vec!["default".into()],
            disabled_hooks: Vec::new(),
            concurrency: 0,
            glob: GlobConfig::default(),
            markdown: MarkdownConfig::default(),
            encryption: EncryptionConfig::default(),
            blogroll: BlogrollConfig::default(),
            feed_defaults: FeedDefaults::default(),
            feeds: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobConfig {
    /// Content file patterns, relative to the project root.
    pub patterns: Vec<String>,
    /// Skip files ignored by `.gitignore`.
    pub use_gitignore: bool,
}

impl Default for GlobConfig {
    fn default() -> Self {
        GlobConfig {
            patterns: vec!["**/*.md".into()],
            use_gitignore: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    pub extensions: Vec<String>,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        MarkdownConfig {
            extensions: vec![
                "tables".into(),
                "strikethrough".into(),
                "autolink".into(),
                "tasklist".into(),
            ],
        }
    }
}

/// Which posts get encrypted and with which key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncryptionConfig {
    pub enabled: bool,
    /// Key name used when a post does not name one.
    pub default_key: String,
    /// Shown to readers on the password prompt.
    pub decryption_hint: String,
}

impl Default for EncryptionConfig {
    fn default() -> Self {
        EncryptionConfig {
            enabled: false,
            default_key: "default".into(),
            decryption_hint: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogrollConfig {
    pub enabled: bool,
    pub cache_dir: String,
}

impl Default for BlogrollConfig {
    fn default() -> Self {
        BlogrollConfig {
            enabled: false,
            cache_dir: ".cache/blogroll".into(),
        }
    }
}

/// Output formats a feed renders to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedFormats {
    pub html: bool,
    pub rss: bool,
    pub atom: bool,
    pub json: bool,
    pub markdown: bool,
    pub text: bool,
}

impl FeedFormats {
    pub fn any_enabled(&self) -> bool {
        self.html || self.rss || self.atom || self.json || self.markdown || self.text
    }
}

/// Per-format template overrides. `None` means the built-in template.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedTemplates {
    pub html: Option<String>,
    pub rss: Option<String>,
    pub atom: Option<String>,
    pub json: Option<String>,
    pub card: Option<String>,
}

impl FeedTemplates {
    /// Fill every unset template from `fallback`.
    pub fn inherit(&self, fallback: &FeedTemplates) -> FeedTemplates {
        FeedTemplates {
            html: self.html.clone().or_else(|| fallback.html.clone()),
            rss: self.rss.clone().or_else(|| fallback.rss.clone()),
            atom: self.atom.clone().or_else(|| fallback.atom.clone()),
            json: self.json.clone().or_else(|| fallback.json.clone()),
            card: self.card.clone().or_else(|| fallback.card.clone()),
        }
    }
}

/// Settings every feed inherits unless it sets its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedDefaults {
    pub items_per_page: i64,
    /// A last page with fewer items than this is folded into the previous one.
    pub orphan_threshold: i64,
    pub formats: FeedFormats,
    pub templates: FeedTemplates,
}

impl Default for FeedDefaults {
    fn default() -> Self {
        FeedDefaults {
            items_per_page: 10,
            orphan_threshold: 3,
            formats: FeedFormats {
                html: true,
                rss: true,
                ..FeedFormats::default()
            },
            templates: FeedTemplates::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// URL path of the feed. Empty is the home feed.
    pub slug: String,
    pub title: String,
    pub description: String,
    /// Expression selecting posts for this feed.
    pub filter: String,
    /// Post field to sort by.
    pub sort: String,
    pub reverse: bool,
    pub items_per_page: Option<i64>,
    pub orphan_threshold: Option<i64>,
    pub formats: Option<FeedFormats>,
    pub templates: FeedTemplates,
}

/// A feed with [`FeedDefaults`] applied.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveFeed {
    pub slug: String,
    pub title: String,
    pub items_per_page: i64,
    pub orphan_threshold: i64,
    pub formats: FeedFormats,
    pub templates: FeedTemplates,
}

impl FeedConfig {
    pub fn effective(&self, defaults: &FeedDefaults) -> EffectiveFeed {
        EffectiveFeed {
            slug: self.slug.clone(),
            title: self.title.clone(),
            items_per_page: self.items_per_page.unwrap_or(defaults.items_per_page),
            orphan_threshold: self.orphan_threshold.unwrap_or(defaults.orphan_threshold),
            formats: self.formats.unwrap_or(defaults.formats),
            templates: self.templates.inherit(&defaults.templates),
        }
    }
}
