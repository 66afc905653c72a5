//! `mcctl config` handlers.

use std::io::Write;

use mcctl_core::{ConfigSource, LoadedSettings};

use crate::commands::ConfigCommand;
use crate::error::CliError;

pub fn execute(
    loaded: &LoadedSettings,
    command: ConfigCommand,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        ConfigCommand::Check => check(loaded, out),
    }
}

/// Print where settings came from and the effective values as TOML.
///
/// Loading already validated the settings, so reaching this point means
/// they are usable.
pub fn check(loaded: &LoadedSettings, out: &mut dyn Write) -> Result<(), CliError> {
    let origin = match (&loaded.path, loaded.source) {
        (Some(path), ConfigSource::Explicit) => format!("{} (--config)", path.display()),
        (Some(path), ConfigSource::EnvVar) => format!("{} ($MCCTL_CONFIG)", path.display()),
        (Some(path), ConfigSource::WorkingDir) => path.display().to_string(),
        (None, _) => "built-in defaults".to_string(),
    };
    let rendered = toml::to_string_pretty(&loaded.settings)
        .map_err(|e| CliError::Config(format!("Cannot render settings: {e}")))?;

    writeln!(out, "# Settings are valid")?;
    writeln!(out, "# Loaded from: {origin}")?;
    writeln!(out, "# Boot history: {}", loaded.settings.history_path().display())?;
    writeln!(out)?;
    write!(out, "{rendered}")?;
    Ok(())
}
