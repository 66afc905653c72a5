//! OS-facing runtime for the mcctl server supervisor.
//!
//! Process spawning, output monitoring, log files, boot history and the
//! host-level probes live here. Domain types come from `mcctl-core`.
#![deny(unsafe_code)]

pub mod access_point;
pub mod history;
mod persist;
pub mod process;
pub mod properties;
pub mod restart_ticket;
pub mod system;

pub use access_point::{AccessPointError, resolve_access_point};
pub use history::BootHistoryStore;
pub use process::{
    BootOutcome, EventBroadcaster, LogArchive, LogTailBuffer, MarkerSet, ProcessSupervisor,
    StartOutcome, StopOutcome, SupervisorStatus,
};
pub use properties::read_server_properties;
pub use restart_ticket::RestartTicketFile;
