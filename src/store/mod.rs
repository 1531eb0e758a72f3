//! Authoritative election state.
//!
//! Holds the candidate map and computes the per-poll diff. The store is
//! constructed once in `main` and handed to the scrape loop (writes) and the
//! client sessions (read-only snapshots).

pub mod election_store;
pub mod types;

pub use election_store::*;
pub use types::*;

use std::sync::{Arc, RwLock};

/// Handle to the store shared between the scrape loop and client sessions.
pub type SharedElectionStore = Arc<RwLock<ElectionStore>>;

/// Creates a fresh shared store.
pub fn shared_store() -> SharedElectionStore {
    Arc::new(RwLock::new(ElectionStore::new()))
}
