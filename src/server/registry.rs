//! Registry of connected viewer sessions.

use axum::extract::ws::Message;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use tokio::sync::mpsc;

/// Identifier handed out to each accepted connection.
pub type ClientId = u64;

/// Sending half of a session's outbound frame queue.
pub type ClientSender = mpsc::Sender<Message>;

/// Outbound queue depth per client. A client this far behind cannot accept
/// writes promptly and is treated as failed rather than buffered further.
pub const CLIENT_BUFFER: usize = 32;

/// Thread-safe set of live connections.
///
/// Sessions register on upgrade and deregister on any terminal condition;
/// the broadcaster iterates a snapshot. The lock is only held to copy the
/// sender list, never across an await.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    next_id: AtomicU64,
    clients: RwLock<HashMap<ClientId, ClientSender>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection and returns its id.
    pub fn register(&self, sender: ClientSender) -> ClientId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut clients) = self.clients.write() {
            clients.insert(id, sender);
        }
        tracing::debug!(client = id, "Connection registered");
        id
    }

    /// Removes a connection. Removing an id that is already gone is a no-op.
    pub fn unregister(&self, id: ClientId) {
        if let Ok(mut clients) = self.clients.write() {
            if clients.remove(&id).is_some() {
                tracing::debug!(client = id, "Connection removed");
            }
        }
    }

    /// Copies out the current senders, for iteration outside the lock.
    pub fn senders(&self) -> Vec<(ClientId, ClientSender)> {
        self.clients
            .read()
            .map(|clients| {
                clients
                    .iter()
                    .map(|(id, sender)| (*id, sender.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of live connections.
    pub fn len(&self) -> usize {
        self.clients.read().map(|clients| clients.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_unregister() {
        let registry = ConnectionRegistry::new();
        let (tx_a, _rx_a) = mpsc::channel(CLIENT_BUFFER);
        let (tx_b, _rx_b) = mpsc::channel(CLIENT_BUFFER);

        let a = registry.register(tx_a);
        let b = registry.register(tx_b);
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);

        registry.unregister(a);
        assert_eq!(registry.len(), 1);

        // Removing again is a no-op, not an error.
        registry.unregister(a);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn senders_snapshot_is_detached() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = mpsc::channel(CLIENT_BUFFER);
        let id = registry.register(tx);

        let snapshot = registry.senders();
        registry.unregister(id);

        // The snapshot taken before removal is unaffected.
        assert_eq!(snapshot.len(), 1);
        assert!(registry.is_empty());
    }
}
