//! Restart ticket file I/O.
//!
//! The ticket is written right before a host reboot and consumed once on
//! the next start-up. Absence is the normal case.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use mcctl_core::domain::RestartTicket;
use mcctl_core::ports::TicketError;
use tracing::{debug, warn};

use crate::persist::{remove_if_exists, write_atomic};

/// Location of the restart ticket.
#[derive(Debug, Clone)]
pub struct RestartTicketFile {
    path: PathBuf,
}

impl RestartTicketFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist a ticket atomically, replacing any previous one.
    pub fn write(&self, ticket: &RestartTicket) -> Result<(), TicketError> {
        let json = serde_json::to_vec_pretty(ticket).map_err(|source| TicketError::Malformed {
            path: self.path.clone(),
            source,
        })?;
        write_atomic(&self.path, &json).map_err(|source| TicketError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), requester = %ticket.requester(), "Wrote restart ticket");
        Ok(())
    }

    /// Read and delete the ticket. `Ok(None)` when there is none.
    ///
    /// A malformed ticket is still deleted so it cannot block later
    /// start-ups, and the parse error is returned.
    pub fn take(&self) -> Result<Option<RestartTicket>, TicketError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(TicketError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let parsed = serde_json::from_slice::<RestartTicket>(&bytes);
        if let Err(e) = remove_if_exists(&self.path) {
            warn!(path = %self.path.display(), error = %e, "Failed to delete restart ticket");
        }

        parsed.map(Some).map_err(|source| TicketError::Malformed {
            path: self.path.clone(),
            source,
        })
    }
}
