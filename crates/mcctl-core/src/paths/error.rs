//! Configuration and path error types.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::settings::SettingsError;

/// Errors that can occur while locating or loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Config file {0} does not exist")]
    NotFound(PathBuf),

    /// Reading the config file failed.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config file is not valid TOML for the settings schema.
    #[error("Failed to parse config file {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The merged settings failed validation.
    #[error("Invalid settings: {0}")]
    Invalid(#[from] SettingsError),

    /// Failed to get the current working directory.
    #[error("Cannot determine current directory: {0}")]
    CurrentDir(#[source] io::Error),
}
