// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShotgraphError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Command failed: {program} (exit={code:?})")]
    CommandFailed { program: String, code: Option<i32> },

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Missing key in task descriptor: {0}")]
    MissingKey(String),

    #[error("Invalid value for '{key}': expected {expected}")]
    InvalidType { key: String, expected: &'static str },

    #[error("No entry for level {level} (and no default) in '{key}'")]
    NoMatchingLevel { key: String, level: String },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ShotgraphError>;
