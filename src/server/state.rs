//! Shared application state for the HTTP server.

use crate::server::registry::ConnectionRegistry;
use crate::store::SharedElectionStore;
use std::sync::Arc;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Authoritative candidate state, written by the scrape loop.
    pub store: SharedElectionStore,

    /// Live viewer connections.
    pub registry: Arc<ConnectionRegistry>,
}

impl AppState {
    /// Creates new app state over the given store and registry.
    pub fn new(store: SharedElectionStore, registry: Arc<ConnectionRegistry>) -> Self {
        Self { store, registry }
    }
}
