//! Fan-out of change sets to connected viewers.

use super::registry::ConnectionRegistry;
use crate::store::ChangeSet;
use axum::extract::ws::Message;

/// Pushes a change set to every registered connection.
///
/// The payload is encoded once, not once per recipient. A client whose
/// queue is full or closed is dropped from the registry; one bad client
/// never aborts delivery to the rest.
pub fn broadcast_changes(registry: &ConnectionRegistry, changes: &ChangeSet) {
    if changes.is_empty() {
        return;
    }

    let payload = match serde_json::to_string(changes) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!(?e, "Failed to encode change set");
            return;
        }
    };

    send_to_all(registry, payload);
}

/// Delivers one already-encoded text frame to every client, reaping those
/// that fail to accept it.
fn send_to_all(registry: &ConnectionRegistry, payload: String) {
    let clients = registry.senders();
    tracing::info!(clients = clients.len(), "Broadcasting to clients");

    let mut stale = Vec::new();
    for (id, sender) in clients {
        if sender.try_send(Message::Text(payload.clone())).is_err() {
            stale.push(id);
        }
    }

    for id in stale {
        tracing::debug!(client = id, "Dropping unresponsive connection");
        registry.unregister(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::registry::CLIENT_BUFFER;
    use crate::store::Candidate;
    use tokio::sync::mpsc;

    fn one_change() -> ChangeSet {
        let mut changes = ChangeSet::new();
        changes.insert(1, Candidate::new(1, "A".to_string(), 10));
        changes
    }

    #[tokio::test]
    async fn delivers_to_every_live_client() {
        let registry = ConnectionRegistry::new();
        let (tx_a, mut rx_a) = mpsc::channel(CLIENT_BUFFER);
        let (tx_b, mut rx_b) = mpsc::channel(CLIENT_BUFFER);
        registry.register(tx_a);
        registry.register(tx_b);

        broadcast_changes(&registry, &one_change());

        for rx in [&mut rx_a, &mut rx_b] {
            let Some(Message::Text(payload)) = rx.recv().await else {
                panic!("expected a text frame");
            };
            let decoded: serde_json::Value = serde_json::from_str(&payload).unwrap();
            assert_eq!(decoded["1"]["Votes"], 10);
        }
    }

    #[tokio::test]
    async fn closed_client_is_reaped_without_blocking_others() {
        let registry = ConnectionRegistry::new();
        let (tx_dead, rx_dead) = mpsc::channel(CLIENT_BUFFER);
        let (tx_live, mut rx_live) = mpsc::channel(CLIENT_BUFFER);
        registry.register(tx_dead);
        registry.register(tx_live);
        drop(rx_dead);

        broadcast_changes(&registry, &one_change());

        assert!(matches!(rx_live.recv().await, Some(Message::Text(_))));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn empty_change_set_sends_nothing() {
        let registry = ConnectionRegistry::new();
        let (tx, mut rx) = mpsc::channel(CLIENT_BUFFER);
        registry.register(tx);

        broadcast_changes(&registry, &ChangeSet::new());

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn full_queue_counts_as_failed() {
        let registry = ConnectionRegistry::new();
        let (tx_slow, _rx_slow) = mpsc::channel(1);
        tx_slow
            .try_send(Message::Text("backlog".to_string()))
            .unwrap();
        registry.register(tx_slow);

        broadcast_changes(&registry, &one_change());

        assert!(registry.is_empty());
    }
}
