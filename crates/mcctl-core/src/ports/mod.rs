//! Port definitions and the error types shared across adapters.
//!
//! # Design Rules
//!
//! - No process or filesystem implementation details in signatures
//! - Errors are semantic; adapters map them to exit codes or chat replies

pub mod progress_sink;

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub use progress_sink::{NoopProgressSink, ProgressSink};

#[cfg(any(test, feature = "test-utils"))]
pub use progress_sink::MockProgressSink;

/// Errors from the boot history store.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Reading or writing the history file failed.
    #[error("Boot history I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The history file is not valid JSON.
    #[error("Boot history at {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors from the per-boot log archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// No archive matches the requested name.
    #[error("Log archive not found: {0}")]
    NotFound(String),

    /// The name would escape the archive directory.
    #[error("Invalid log archive name: {0}")]
    InvalidName(String),

    /// The log directory could not be created.
    #[error("Failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A new archive could not be created (including name collisions).
    #[error("Failed to create log archive {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Any other filesystem failure.
    #[error("Log archive I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors from restart ticket persistence.
#[derive(Debug, Error)]
pub enum TicketError {
    #[error("Restart ticket I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Restart ticket at {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors surfaced by supervisor operations.
///
/// Precondition violations leave the state untouched. Resource failures
/// abort the operation in progress and leave the supervisor OFF.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// No child process is held.
    #[error("Server is not running")]
    NotRunning,

    /// The operation is not allowed in the current state.
    #[error("Cannot {operation} while the server is {state}")]
    InvalidState {
        operation: &'static str,
        state: crate::domain::ServerState,
    },

    /// Creating this boot's log archive failed.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// Spawning the child failed.
    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The child's standard input was not captured.
    #[error("Server stdin is not available")]
    StdinUnavailable,

    /// Writing a command to the child failed.
    #[error("Failed to write to server stdin: {0}")]
    Write(#[source] io::Error),

    /// Loading or saving boot history failed.
    #[error(transparent)]
    History(#[from] HistoryError),
}
