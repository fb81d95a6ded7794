//! Event Broadcasting
//!
//! Fans `Posted` events out to any number of async subscribers.

use crate::core_board::events::Posted;
use tokio::sync::broadcast;

/// Event broadcaster for board events
///
/// Uses a tokio broadcast channel. Sending never blocks; a subscriber that
/// falls more than `capacity` events behind gets `RecvError::Lagged`.
#[derive(Clone)]
pub struct EventBroadcaster {
    tx: broadcast::Sender<Posted>,
}

impl EventBroadcaster {
    /// Create a new event broadcaster
    ///
    /// # Arguments
    /// * `capacity` - Channel capacity (number of events buffered per subscriber)
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Emit an event to all subscribers
    ///
    /// # Returns
    /// Number of active subscribers that received the event
    pub fn emit(&self, event: Posted) -> usize {
        // Err only means nobody is listening
        self.tx.send(event).unwrap_or(0)
    }

    /// Subscribe to events emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Posted> {
        self.tx.subscribe()
    }

    /// Get number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new(1024)
    }
}
