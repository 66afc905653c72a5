//! Restart ticket bridging a host reboot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where the post-reboot notification should be delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TicketTarget {
    /// Reply to a user directly.
    User(String),
    /// Reply in a channel.
    Channel(String),
}

/// Record written right before a host reboot is requested.
///
/// Read back on the next start-up to close the loop with the requester,
/// then deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestartTicket {
    /// Whether the request came from a direct message.
    pub is_direct_message: bool,
    /// When the reboot was requested.
    pub issued_at: DateTime<Utc>,
    /// Identifier of the message that asked for the reboot.
    pub target_message_id: String,
    /// Requester to notify.
    #[serde(flatten)]
    pub target: TicketTarget,
}

impl RestartTicket {
    /// Create a ticket stamped with the current time.
    pub fn new(target: TicketTarget, target_message_id: impl Into<String>) -> Self {
        Self {
            is_direct_message: matches!(target, TicketTarget::User(_)),
            issued_at: Utc::now(),
            target_message_id: target_message_id.into(),
            target,
        }
    }

    /// Identity string of whoever is notified.
    pub fn requester(&self) -> &str {
        match &self.target {
            TicketTarget::User(id) | TicketTarget::Channel(id) => id,
        }
    }
}
