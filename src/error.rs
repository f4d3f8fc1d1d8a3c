//! Error types for the dictator

use std::io;
use thiserror::Error;

/// Main error type for the dictator
#[derive(Error, Debug)]
pub enum DictatorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("INI parse error: {0}")]
    IniParse(String),

    #[error("Speech synthesis error: {0}")]
    Speech(String),

    #[error("Invalid selection: {0}")]
    Selection(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for dictator operations
pub type Result<T> = std::result::Result<T, DictatorError>;

impl From<String> for DictatorError {
    fn from(s: String) -> Self {
        DictatorError::Other(s)
    }
}

impl From<&str> for DictatorError {
    fn from(s: &str) -> Self {
        DictatorError::Other(s.to_string())
    }
}
