//! Broadcast channel for domain events.
//!
//! [`EventBus`] wraps a [`tokio::sync::broadcast`] channel. Every committed
//! contract call publishes a [`PoolEvent`] through the bus; WebSocket
//! connections and the persistence logger subscribe to it.

use tokio::sync::broadcast;

use super::PoolEvent;

/// Broadcast bus for [`PoolEvent`]s.
///
/// Backed by a `tokio::broadcast` channel with a configurable capacity
/// (default 10 000). When the ring buffer is full, the oldest events are
/// dropped for lagging receivers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<PoolEvent>,
}

impl EventBus {
    /// Creates a new `EventBus` with the given channel capacity (at least 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of receivers that received the event.
    /// If there are no active receivers, the event is silently dropped.
    pub fn publish(&self, event: PoolEvent) -> usize {
        let pool_id = event.pool_id();
        let event_type = event.event_type_str();
        let delivered = self.sender.send(event).unwrap_or(0);
        tracing::trace!(%pool_id, event_type, delivered, "event published");
        delivered
    }

    /// Creates a new receiver that will receive all future events.
    ///
    /// Each WebSocket connection calls this once on connect.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PoolEvent> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
