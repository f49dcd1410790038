//! Error types for lens configuration.

use std::{io, path::PathBuf};

use thiserror::Error;
use toml::{de, ser};

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("failed to parse config file {path}: {source}")]
    ParseToml {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: de::Error,
    },

    /// A setting holds a value that can never work.
    #[error("invalid value for {key} in {path}: {reason}")]
    InvalidValue {
        /// Path to the file holding the value.
        path: PathBuf,
        /// Dotted key of the setting.
        key: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Failed to render the effective settings as TOML.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] ser::Error),
}
