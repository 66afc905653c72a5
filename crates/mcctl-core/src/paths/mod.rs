//! Configuration file location and loading.
//!
//! # Design
//!
//! - Returns `PathBuf` and `ConfigError` for clear error handling
//! - Environment access goes through a lookup function so resolution is
//!   testable without mutating the process environment

mod config;
mod error;

pub use config::{
    CONFIG_ENV_VAR, ConfigSource, DEFAULT_CONFIG_FILE, LoadedSettings, load_settings,
    load_settings_with, resolve_config_path,
};
pub use error::ConfigError;
