//! Supervisor lifecycle event broadcasting.
//!
//! Each supervisor owns its broadcaster. The output reader publishes and
//! returns immediately; subscribers run their side effects on their own
//! tasks.

use mcctl_core::events::SupervisorEvent;
use tokio::sync::broadcast;
use tracing::debug;

/// Broadcast channel capacity for lifecycle events
const CHANNEL_CAPACITY: usize = 64;

/// Broadcaster for supervisor lifecycle events
#[derive(Debug)]
pub struct EventBroadcaster {
    sender: broadcast::Sender<SupervisorEvent>,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    pub fn broadcast(&self, event: SupervisorEvent) {
        debug!(?event, subscribers = self.sender.receiver_count(), "Broadcasting supervisor event");
        // no receivers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SupervisorEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
