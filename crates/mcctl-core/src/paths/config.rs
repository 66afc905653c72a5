//! Config file resolution and TOML loading.
//!
//! Precedence, lowest to highest: built-in defaults, the TOML file,
//! `MCCTL_*` environment variables.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use crate::settings::{SupervisorSettings, validate_settings};

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "MCCTL_CONFIG";

/// Config file looked up in the working directory when nothing else is set.
pub const DEFAULT_CONFIG_FILE: &str = "mcctl.toml";

/// Where the config file path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Passed on the command line.
    Explicit,
    /// Named by `MCCTL_CONFIG`.
    EnvVar,
    /// `./mcctl.toml`.
    WorkingDir,
}

impl ConfigSource {
    /// Explicit and env-provided paths must exist; the working-dir
    /// default is optional.
    const fn required(self) -> bool {
        !matches!(self, Self::WorkingDir)
    }
}

/// Settings together with where they were loaded from.
#[derive(Debug, Clone)]
pub struct LoadedSettings {
    pub settings: SupervisorSettings,
    /// `None` when only defaults and env overrides applied.
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Resolve which config file to read.
pub fn resolve_config_path<F>(
    explicit: Option<&Path>,
    cwd: &Path,
    lookup: F,
) -> (PathBuf, ConfigSource)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = explicit {
        return (path.to_path_buf(), ConfigSource::Explicit);
    }
    if let Some(path) = lookup(CONFIG_ENV_VAR).filter(|p| !p.trim().is_empty()) {
        return (PathBuf::from(path), ConfigSource::EnvVar);
    }
    (cwd.join(DEFAULT_CONFIG_FILE), ConfigSource::WorkingDir)
}

/// Load settings using the real process environment.
pub fn load_settings(explicit: Option<&Path>) -> Result<LoadedSettings, ConfigError> {
    let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
    load_settings_with(explicit, &cwd, |key| std::env::var(key).ok())
}

/// Load, merge and validate settings.
///
/// Relative paths inside the file are resolved against the file's
/// directory. Relative paths from environment overrides are resolved
/// against `cwd`.
pub fn load_settings_with<F>(
    explicit: Option<&Path>,
    cwd: &Path,
    lookup: F,
) -> Result<LoadedSettings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let (path, source) = resolve_config_path(explicit, cwd, &lookup);
    let path = if path.is_relative() {
        cwd.join(path)
    } else {
        path
    };

    let (mut settings, loaded_from) = if path.is_file() {
        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let mut settings: SupervisorSettings =
            toml::from_str(&text).map_err(|source| ConfigError::Toml {
                path: path.clone(),
                source,
            })?;
        let base = path.parent().unwrap_or(cwd);
        settings.rebase(base);
        (settings, Some(path))
    } else if source.required() {
        return Err(ConfigError::NotFound(path));
    } else {
        let mut settings = SupervisorSettings::default();
        settings.rebase(cwd);
        (settings, None)
    };

    settings.apply_overrides(&lookup);
    settings.rebase(cwd);
    validate_settings(&settings)?;

    Ok(LoadedSettings {
        settings,
        path: loaded_from,
        source,
    })
}
