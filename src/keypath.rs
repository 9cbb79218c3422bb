//! Dotted key paths with optional array indices.
//!
//! Grammar: `segment ("." segment)*` where `segment := key ("[" integer "]")?`.
//! `feeds[0].formats.rss` is three segments; the first carries index `0`.
//!
//! Only one bracket per segment is recognized. `a[0][1]` is rejected: the
//! second `[` has no key text in front of it. The index itself may carry a
//! sign so that `feeds[-1]` parses; the addressing engine rejects it.

use std::fmt;
use std::str::FromStr;

use crate::config::ROOT_NAMESPACE;
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySegment {
    /// Key text with its original casing.
    pub key: String,
    pub index: Option<i64>,
}

impl KeySegment {
    pub fn new(key: impl Into<String>) -> Self {
        KeySegment {
            key: key.into(),
            index: None,
        }
    }

    pub fn indexed(key: impl Into<String>, index: i64) -> Self {
        KeySegment {
            key: key.into(),
            index: Some(index),
        }
    }
}

impl fmt::Display for KeySegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "{}[{i}]", self.key),
            None => write!(f, "{}", self.key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    segments: Vec<KeySegment>,
}

impl KeyPath {
    /// Parse a dotted key path.
    pub fn parse(input: &str) -> Result<KeyPath> {
        if input.trim().is_empty() {
            return Err(invalid(input, "path is empty"));
        }

        let mut segments = Vec::new();
        let mut key = String::new();
        // Set right after a `]`; only `.` or end of input may follow.
        let mut closed = false;
        let mut chars = input.chars();

        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    if closed {
                        closed = false;
                        continue;
                    }
                    if key.is_empty() {
                        return Err(invalid(input, "empty segment before '.'"));
                    }
                    segments.push(KeySegment::new(std::mem::take(&mut key)));
                }
                '[' => {
                    if key.is_empty() {
                        return Err(invalid(input, "'[' must follow a key"));
                    }
                    let mut digits = String::new();
                    let mut terminated = false;
                    for d in chars.by_ref() {
                        if d == ']' {
                            terminated = true;
                            break;
                        }
                        digits.push(d);
                    }
                    if !terminated {
                        return Err(invalid(input, "unterminated '['"));
                    }
                    let index = digits.parse::<i64>().map_err(|_| {
                        invalid(input, &format!("index '{digits}' is not an integer"))
                    })?;
                    segments.push(KeySegment::indexed(std::mem::take(&mut key), index));
                    closed = true;
                }
                _ => {
                    if closed {
                        return Err(invalid(input, "expected '.' after ']'"));
                    }
                    key.push(c);
                }
            }
        }

        if !closed {
            if key.is_empty() {
                return Err(invalid(input, "trailing '.'"));
            }
            segments.push(KeySegment::new(key));
        }

        Ok(KeyPath { segments })
    }

    pub fn from_segments(segments: Vec<KeySegment>) -> Self {
        KeyPath { segments }
    }

    /// Prefix the root namespace (`markata-go`) unless the path already
    /// starts with it, compared case-insensitively.
    pub fn with_root_namespace(mut self) -> Self {
        let rooted = self
            .segments
            .first()
            .is_some_and(|s| s.key.eq_ignore_ascii_case(ROOT_NAMESPACE));
        if !rooted {
            self.segments.insert(0, KeySegment::new(ROOT_NAMESPACE));
        }
        self
    }

    pub fn segments(&self) -> &[KeySegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl FromStr for KeyPath {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        KeyPath::parse(s)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(&self.segments))
    }
}

/// Render segments back into key-path syntax.
pub(crate) fn render(segments: &[KeySegment]) -> String {
    segments
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

fn invalid(input: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidKeyPath {
        path: input.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(path: &KeyPath) -> Vec<(&str, Option<i64>)> {
        path.segments()
            .iter()
            .map(|s| (s.key.as_str(), s.index))
            .collect()
    }

    #[test]
    fn single_key() {
        let path = KeyPath::parse("title").unwrap();
        assert_eq!(keys(&path), vec![("title", None)]);
    }

    #[test]
    fn dotted_keys() {
        let path = KeyPath::parse("feed_defaults.formats.rss").unwrap();
        assert_eq!(
            keys(&path),
            vec![
                ("feed_defaults", None),
                ("formats", None),
                ("rss", None)
            ]
        );
    }

    #[test]
    fn indexed_segment() {
        let path = KeyPath::parse("feeds[0].formats.rss").unwrap();
        assert_eq!(
            keys(&path),
            vec![("feeds", Some(0)), ("formats", None), ("rss", None)]
        );
    }

    #[test]
    fn trailing_index() {
        let path = KeyPath::parse("glob.patterns[12]").unwrap();
        assert_eq!(keys(&path), vec![("glob", None), ("patterns", Some(12))]);
    }

    #[test]
    fn negative_index_parses() {
        let path = KeyPath::parse("feeds[-1]").unwrap();
        assert_eq!(keys(&path), vec![("feeds", Some(-1))]);
    }

    #[test]
    fn preserves_casing() {
        let path = KeyPath::parse("Markata-Go.Title").unwrap();
        assert_eq!(keys(&path), vec![("Markata-Go", None), ("Title", None)]);
    }

    #[test]
    fn rejects_empty_and_whitespace() {
        assert!(KeyPath::parse("").is_err());
        assert!(KeyPath::parse("   ").is_err());
    }

    #[test]
    fn rejects_leading_double_and_trailing_dots() {
        assert!(KeyPath::parse(".title").is_err());
        assert!(KeyPath::parse("a..b").is_err());
        assert!(KeyPath::parse("a.").is_err());
        assert!(KeyPath::parse("a[0].").is_err());
    }

    #[test]
    fn rejects_bracket_without_key() {
        assert!(KeyPath::parse("[0]").is_err());
        assert!(KeyPath::parse("a.[0]").is_err());
    }

    #[test]
    fn rejects_second_bracket() {
        let err = KeyPath::parse("a[0][1]").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidKeyPath { .. }));
    }

    #[test]
    fn rejects_text_after_bracket() {
        assert!(KeyPath::parse("a[0]b").is_err());
    }

    #[test]
    fn rejects_unterminated_bracket() {
        assert!(KeyPath::parse("feeds[0").is_err());
    }

    #[test]
    fn rejects_non_integer_index() {
        assert!(KeyPath::parse("feeds[x]").is_err());
        assert!(KeyPath::parse("feeds[]").is_err());
        assert!(KeyPath::parse("feeds[1.5]").is_err());
    }

    #[test]
    fn root_namespace_is_prefixed_once() {
        let path = KeyPath::parse("output_dir").unwrap().with_root_namespace();
        assert_eq!(path.to_string(), "markata-go.output_dir");
        let again = path.clone().with_root_namespace();
        assert_eq!(again, path);
    }

    #[test]
    fn root_namespace_match_is_case_insensitive() {
        let path = KeyPath::parse("MARKATA-GO.title")
            .unwrap()
            .with_root_namespace();
        assert_eq!(path.len(), 2);
        assert_eq!(path.segments()[0].key, "MARKATA-GO");
    }

    #[test]
    fn display_round_trips() {
        let input = "markata-go.feeds[3].templates.html";
        assert_eq!(KeyPath::parse(input).unwrap().to_string(), input);
    }
}
