//! CLI-specific error types and mappings.
//!
//! Library errors are mapped onto a small set of categories, each with a
//! sysexits-style exit code.

use mcctl_core::{ArchiveError, ConfigError, HistoryError, SupervisorError, TicketError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid usage.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// Config file missing, malformed or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A requested archive or file does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Filesystem failure.
    #[error("IO error: {0}")]
    Io(String),

    /// The server process could not be spawned or controlled.
    #[error("Process error: {0}")]
    Process(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Arguments(_) => 2,
            Self::NotFound(_) => 66, // EX_NOINPUT
            Self::Process(_) => 71,  // EX_OSERR
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<ArchiveError> for CliError {
    fn from(err: ArchiveError) -> Self {
        match err {
            ArchiveError::NotFound(_) => Self::NotFound(err.to_string()),
            ArchiveError::InvalidName(_) => Self::Arguments(err.to_string()),
            ArchiveError::CreateDir { .. } | ArchiveError::Create { .. } | ArchiveError::Io(_) => {
                Self::Io(err.to_string())
            }
        }
    }
}

impl From<HistoryError> for CliError {
    fn from(err: HistoryError) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<TicketError> for CliError {
    fn from(err: TicketError) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<SupervisorError> for CliError {
    fn from(err: SupervisorError) -> Self {
        match err {
            SupervisorError::Archive(archive) => archive.into(),
            SupervisorError::History(history) => history.into(),
            SupervisorError::NotRunning | SupervisorError::InvalidState { .. } => {
                Self::Arguments(err.to_string())
            }
            SupervisorError::Spawn { .. }
            | SupervisorError::StdinUnavailable
            | SupervisorError::Write(_) => Self::Process(err.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
