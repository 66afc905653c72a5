//! Server process supervision.
//!
//! # Structure
//!
//! - `ProcessSupervisor` - owns the child, the state machine and the output loop
//! - `LogTailBuffer` - bounded recent output, searchable by substring
//! - `LogArchive` - one durable log file per boot
//! - `MarkerSet` - the only place output lines are matched against markers
//! - `EventBroadcaster` - lifecycle events for subscribers

mod archive;
mod broadcaster;
mod command;
mod markers;
pub mod shutdown;
mod stream;
mod supervisor;
mod tail;
mod types;

pub use archive::{
    ARCHIVE_NAME_FORMAT, ArchiveWriter, LATEST, LogArchive, archive_name, parse_archive_name,
};
pub use broadcaster::EventBroadcaster;
pub use command::LaunchSpec;
pub use markers::{Marker, MarkerSet};
pub use shutdown::shutdown_child;
pub use supervisor::ProcessSupervisor;
pub use tail::{LogTailBuffer, TailLine};
pub use types::{BootOutcome, StartOutcome, StopOutcome, SupervisorStatus};
