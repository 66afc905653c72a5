//! Supervisor lifecycle events.
//!
//! The output reader publishes these; whatever owns caller-facing side
//! effects (presence text, status displays) subscribes and reacts on its
//! own task. The reader never performs those side effects itself.

use serde::{Deserialize, Serialize};

use crate::domain::ServerState;

/// Lifecycle event payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SupervisorEvent {
    /// A child was spawned and a new archive opened.
    #[serde(rename_all = "camelCase")]
    Starting { archive: String, updated_at: u64 },

    /// The readiness marker was seen.
    #[serde(rename_all = "camelCase")]
    Online { boot_secs: f64, updated_at: u64 },

    /// A stop was requested by the operator.
    #[serde(rename_all = "camelCase")]
    Stopping { updated_at: u64 },

    /// The process is gone and the state is OFF.
    ///
    /// `in_band` is true when the server shut itself down (for example an
    /// in-game stop) rather than through the supervisor.
    #[serde(rename_all = "camelCase")]
    Stopped { in_band: bool, updated_at: u64 },

    /// Output closed without a readiness or shutdown marker.
    #[serde(rename_all = "camelCase")]
    Crashed { during: ServerState, updated_at: u64 },

    /// The boot deadline passed while still STARTING.
    #[serde(rename_all = "camelCase")]
    BootTimedOut { elapsed_secs: f64, updated_at: u64 },
}

impl SupervisorEvent {
    pub fn starting(archive: impl Into<String>) -> Self {
        Self::Starting {
            archive: archive.into(),
            updated_at: now_ms(),
        }
    }

    pub fn online(boot_secs: f64) -> Self {
        Self::Online {
            boot_secs,
            updated_at: now_ms(),
        }
    }

    pub fn stopping() -> Self {
        Self::Stopping {
            updated_at: now_ms(),
        }
    }

    pub fn stopped(in_band: bool) -> Self {
        Self::Stopped {
            in_band,
            updated_at: now_ms(),
        }
    }

    pub fn crashed(during: ServerState) -> Self {
        Self::Crashed {
            during,
            updated_at: now_ms(),
        }
    }

    pub fn boot_timed_out(elapsed_secs: f64) -> Self {
        Self::BootTimedOut {
            elapsed_secs,
            updated_at: now_ms(),
        }
    }

    /// State the supervisor is in once this event has been published.
    pub const fn resulting_state(&self) -> ServerState {
        match self {
            Self::Starting { .. } | Self::BootTimedOut { .. } => ServerState::Starting,
            Self::Online { .. } => ServerState::On,
            Self::Stopping { .. } => ServerState::Stopping,
            Self::Stopped { .. } | Self::Crashed { .. } => ServerState::Off,
        }
    }

    /// Unix timestamp in milliseconds when the event was created.
    pub const fn updated_at(&self) -> u64 {
        match self {
            Self::Starting { updated_at, .. }
            | Self::Online { updated_at, .. }
            | Self::Stopping { updated_at }
            | Self::Stopped { updated_at, .. }
            | Self::Crashed { updated_at, .. }
            | Self::BootTimedOut { updated_at, .. } => *updated_at,
        }
    }
}

fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}
