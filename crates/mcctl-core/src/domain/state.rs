//! Supervised server lifecycle state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of the supervised server process.
///
/// The normal lifecycle is `Off -> Starting -> On -> Stopping -> Off`.
/// Two extra edges exist for failures: a child that exits on its own
/// (`Starting -> Off`, `On -> Off`) and an aborted start (`Starting -> Off`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerState {
    /// No child process is held.
    #[default]
    Off,
    /// Child spawned, readiness marker not yet seen.
    Starting,
    /// Readiness marker seen, server accepting players.
    On,
    /// Shutdown in progress, waiting for confirmation.
    Stopping,
}

impl ServerState {
    /// Whether `self -> next` is a legal transition.
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Off, Self::Starting)
                | (Self::Starting, Self::On)
                | (Self::On, Self::Stopping)
                | (Self::Stopping, Self::Off)
                // crash or aborted start
                | (Self::Starting, Self::Off)
                // crash while running
                | (Self::On, Self::Off)
        )
    }

    /// Whether a child process is expected to be alive in this state.
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Off)
    }

    /// Lowercase label used in logs and status output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Starting => "starting",
            Self::On => "on",
            Self::Stopping => "stopping",
        }
    }
}

impl fmt::Display for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ServerState; 4] = [
        ServerState::Off,
        ServerState::Starting,
        ServerState::On,
        ServerState::Stopping,
    ];

    #[test]
    fn test_normal_lifecycle_is_legal() {
        let cycle = [
            ServerState::Off,
            ServerState::Starting,
            ServerState::On,
            ServerState::Stopping,
            ServerState::Off,
        ];
        for pair in cycle.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{:?}", pair);
        }
    }

    #[test]
    fn test_no_state_skips_forward() {
        assert!(!ServerState::Off.can_transition_to(ServerState::On));
        assert!(!ServerState::Off.can_transition_to(ServerState::Stopping));
        assert!(!ServerState::Starting.can_transition_to(ServerState::Stopping));
        assert!(!ServerState::Stopping.can_transition_to(ServerState::On));
        assert!(!ServerState::Stopping.can_transition_to(ServerState::Starting));
    }

    #[test]
    fn test_self_transitions_are_rejected() {
        for state in ALL {
            assert!(!state.can_transition_to(state));
        }
    }

    #[test]
    fn test_serialization_is_lowercase() {
        let json = serde_json::to_string(&ServerState::Stopping).unwrap();
        assert_eq!(json, "\"stopping\"");
        assert_eq!(ServerState::On.to_string(), "on");
    }
}
