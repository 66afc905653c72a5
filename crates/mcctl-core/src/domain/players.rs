//! Connected player listing parsed from server output.

use serde::{Deserialize, Serialize};

/// Players reported by the server's list command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedPlayers {
    /// Player names in the order the server printed them.
    pub names: Vec<String>,
}

impl ConnectedPlayers {
    /// Parse the reply line of a list command.
    ///
    /// Everything after the last `:` is treated as a comma separated list of
    /// names, so log prefixes such as `[12:00:01] [Server thread/INFO]:` are
    /// skipped. A line without a `:` yields no players.
    pub fn parse_reply(line: &str) -> Self {
        let Some((_, suffix)) = line.rsplit_once(':') else {
            return Self::default();
        };
        let names = suffix
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(ToString::to_string)
            .collect();
        Self { names }
    }

    /// Number of players online.
    pub fn count(&self) -> usize {
        self.names.len()
    }

    /// Names joined for display, `None` when nobody is online.
    pub fn formatted(&self) -> Option<String> {
        if self.names.is_empty() {
            None
        } else {
            Some(self.names.join(", "))
        }
    }
}

/// Result of a best-effort player query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayerQuery {
    /// The server answered in time.
    Online(ConnectedPlayers),
    /// The reply did not show up before the deadline.
    Unknown,
    /// No child process is held, or it is not in the ON state.
    NotRunning,
}
