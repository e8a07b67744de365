//! Registrant change event publishing.
//!
//! A single broadcast channel feeds every subscribed admin console, with a
//! periodic reconciliation event as the explicit fallback. This replaces
//! uncoordinated per-client polling.

use serde::Serialize;
use tokio::sync::broadcast;

/// A change to the registrant collection.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RegistrantEvent {
    /// A registration was submitted.
    Created { id: String },
    /// A registrant moved through the approval lifecycle.
    StatusChanged { id: String, status: String },
    /// A registrant was removed (rejection or manual delete).
    Deleted { id: String },
    /// Periodic hint for subscribers to re-fetch the full list.
    Reconcile,
    /// Connection established.
    Connected,
}

/// Broadcast publisher for registrant events.
#[derive(Clone)]
pub struct EventPublisher {
    tx: broadcast::Sender<RegistrantEvent>,
}

impl EventPublisher {
    /// Create a new publisher.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1000);
        Self { tx }
    }

    /// Subscribe to registrant events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RegistrantEvent> {
        self.tx.subscribe()
    }

    /// Publish an event. Dropped silently when no console is connected.
    pub fn publish(&self, event: RegistrantEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}
