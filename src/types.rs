use std::fmt;
use std::path::{Path, PathBuf};

/// On-disk encoding of a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Toml,
    Yaml,
    Json,
}

impl Format {
    /// Detect the format from a file extension, case-insensitively.
    ///
    /// `.yaml`/`.yml` select YAML and `.json` selects JSON. Anything else,
    /// including a missing extension, falls back to TOML.
    pub fn from_path(path: &Path) -> Format {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("yaml") | Some("yml") => Format::Yaml,
            Some("json") => Format::Json,
            _ => Format::Toml,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Toml => write!(f, "TOML"),
            Format::Yaml => write!(f, "YAML"),
            Format::Json => write!(f, "JSON"),
        }
    }
}

/// Where a discovered config file came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The platform config directory (`~/.config/markata-go/` on Linux).
    User,
    /// The project directory, usually the current working directory.
    Project,
    /// A path the caller named explicitly.
    Explicit,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::User => write!(f, "user"),
            Origin::Project => write!(f, "project"),
            Origin::Explicit => write!(f, "explicit"),
        }
    }
}

/// A config file located by discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub path: PathBuf,
    pub format: Format,
    pub origin: Origin,
}

impl ConfigSource {
    pub fn new(path: PathBuf, origin: Origin) -> Self {
        let format = Format::from_path(&path);
        ConfigSource {
            path,
            format,
            origin,
        }
    }
}

/// A file operation, independent of any CLI framework.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigAction {
    /// Read the value at a key path.
    Get { key: String },
    /// Write a raw value at a key path, creating intermediate structure.
    Set { key: String, value: String },
    /// List every resolved setting as dotted key-value pairs.
    List,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_detection_is_case_insensitive() {
        assert_eq!(Format::from_path(Path::new("site.YAML")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("site.Yml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("site.JSON")), Format::Json);
        assert_eq!(Format::from_path(Path::new("site.toml")), Format::Toml);
    }

    #[test]
    fn unknown_extension_defaults_to_toml() {
        assert_eq!(Format::from_path(Path::new("site.conf")), Format::Toml);
        assert_eq!(Format::from_path(Path::new("markata-go")), Format::Toml);
    }

    #[test]
    fn source_detects_format() {
        let src = ConfigSource::new("/x/markata-go.yml".into(), Origin::Project);
        assert_eq!(src.format, Format::Yaml);
        assert_eq!(src.origin.to_string(), "project");
    }
}
