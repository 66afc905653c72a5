//! Result types for supervisor operations.

use std::time::Duration;

use mcctl_core::domain::ServerState;

/// Result of [`ProcessSupervisor::start`](super::ProcessSupervisor::start).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new child was spawned and logs to this archive.
    Started { archive: String },
    /// A child is already held; nothing was spawned.
    AlreadyRunning(ServerState),
}

/// How a boot watch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootOutcome {
    /// The readiness marker was seen after `boot`.
    Online { boot: Duration },
    /// Output closed before the readiness marker.
    Crashed { elapsed: Duration },
    /// The boot deadline passed; the process is still running.
    TimedOut { elapsed: Duration },
    /// The session ended some other way (killed or stopped).
    Stopped,
}

/// How a stop finished. The state is OFF in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// The shutdown marker appeared after the stop command.
    Confirmed,
    /// Output closed without the marker.
    Exited,
    /// Confirmation never came and the process was terminated.
    Forced,
}

impl StopOutcome {
    pub const fn was_forced(self) -> bool {
        matches!(self, Self::Forced)
    }
}

/// Point-in-time view of the supervisor.
#[derive(Debug, Clone, PartialEq)]
pub struct SupervisorStatus {
    pub state: ServerState,
    /// Archive of the current or most recent boot.
    pub archive: Option<String>,
    /// Time since the current child was spawned.
    pub uptime: Option<Duration>,
    /// Boot time of the current child once it is ON.
    pub boot: Option<Duration>,
    /// Historical mean boot time in seconds.
    pub average_boot_secs: Option<f64>,
    pub recorded_boots: usize,
}
