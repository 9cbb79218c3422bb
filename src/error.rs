use std::path::PathBuf;

use thiserror::Error;

use crate::types::Format;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid key path '{path}': {reason}")]
    InvalidKeyPath { path: String, reason: String },

    #[error("Failed to parse {path} as {format}: {reason}")]
    Decode {
        path: PathBuf,
        format: Format,
        reason: String,
    },

    #[error("Failed to encode {format}: {reason}")]
    Encode { format: Format, reason: String },

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Cannot index '{key}': expected a sequence, found {found}")]
    TypeMismatch { key: String, found: &'static str },

    #[error("Index {index} out of range for '{key}' (length {len})")]
    IndexOutOfRange { key: String, index: i64, len: usize },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.into(),
            source,
        }
    }
}
