//! `mcctl logs` handlers.
//!
//! Read the archive directory directly; no supervisor is created.

use std::io::Write;

use mcctl_core::SupervisorSettings;
use mcctl_runtime::LogArchive;

use crate::commands::LogsCommand;
use crate::error::CliError;
use crate::presentation::archive_list_panel;

pub fn execute(
    settings: &SupervisorSettings,
    command: LogsCommand,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let archive = LogArchive::new(&settings.logs_dir);
    match command {
        LogsCommand::List { limit } => list(&archive, limit, out),
        LogsCommand::Show { name } => show(&archive, &name, out),
    }
}

/// Print archive names, newest first.
pub fn list(archive: &LogArchive, limit: Option<usize>, out: &mut dyn Write) -> Result<(), CliError> {
    if limit == Some(0) {
        return Err(CliError::Arguments("--limit must be at least 1".to_string()));
    }
    let names = archive.list(limit)?;
    writeln!(out, "{}", archive_list_panel(&names))?;
    Ok(())
}

/// Print one archive verbatim.
pub fn show(archive: &LogArchive, name: &str, out: &mut dyn Write) -> Result<(), CliError> {
    let content = archive.fetch(name)?;
    out.write_all(content.as_bytes())?;
    Ok(())
}
