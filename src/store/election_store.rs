//! Authoritative candidate state and the snapshot diff.
//!
//! The store owns the only mutable copy of the candidate map. Everything
//! else sees read-only copies: the broadcaster gets the change set, viewer
//! queries get a full snapshot.

use super::types::{Candidate, ChangeSet, RawCandidate};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// The main store for candidate state.
///
/// Wrap in `Arc<RwLock<ElectionStore>>` for access from the scrape loop and
/// the client sessions (see [`super::SharedElectionStore`]).
#[derive(Debug, Default)]
pub struct ElectionStore {
    /// Last-known record per candidate id. Entries are never removed; a
    /// candidate that disappears from the page simply stops updating.
    candidates: HashMap<u64, Candidate>,

    /// Time of the last successfully applied poll.
    pub last_poll: Option<DateTime<Utc>>,
}

impl ElectionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one extracted page snapshot and returns the changed subset.
    ///
    /// Per incoming row: an unseen id is inserted with `has_changed` set; a
    /// known id with a different count is updated in place and flagged; a
    /// known id with the same count has its flag cleared and stays out of the
    /// change set. Ids in state but absent from `rows` are left untouched.
    pub fn apply_snapshot(&mut self, rows: impl IntoIterator<Item = RawCandidate>) -> ChangeSet {
        let mut changed = ChangeSet::new();

        for row in rows {
            tracing::debug!(id = row.id, name = %row.name, votes = row.votes, "Candidate row");

            match self.candidates.get_mut(&row.id) {
                Some(candidate) if candidate.votes != row.votes => {
                    candidate.votes = row.votes;
                    candidate.has_changed = true;
                    changed.insert(row.id, candidate.clone());
                }
                Some(candidate) => {
                    candidate.has_changed = false;
                }
                None => {
                    let candidate = Candidate::new(row.id, row.name, row.votes);
                    changed.insert(row.id, candidate.clone());
                    self.candidates.insert(row.id, candidate);
                }
            }
        }

        self.last_poll = Some(Utc::now());
        changed
    }

    /// Full copy of the current state, for on-demand viewer queries.
    pub fn snapshot(&self) -> HashMap<u64, Candidate> {
        self.candidates.clone()
    }

    /// Looks up a single candidate.
    pub fn get(&self, id: u64) -> Option<&Candidate> {
        self.candidates.get(&id)
    }

    /// Number of candidates seen so far.
    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: u64, name: &str, votes: u64) -> RawCandidate {
        RawCandidate {
            id,
            name: name.to_string(),
            votes,
        }
    }

    #[test]
    fn first_sight_counts_as_changed() {
        let mut store = ElectionStore::new();
        let changes = store.apply_snapshot(vec![row(1, "A", 10)]);

        assert_eq!(changes.len(), 1);
        assert!(changes[&1].has_changed);
        assert_eq!(store.get(1).unwrap().votes, 10);
        assert!(store.last_poll.is_some());
    }

    #[test]
    fn identical_snapshot_is_idempotent() {
        let mut store = ElectionStore::new();
        store.apply_snapshot(vec![row(1, "A", 10), row(2, "B", 5)]);

        let changes = store.apply_snapshot(vec![row(1, "A", 10), row(2, "B", 5)]);
        assert!(changes.is_empty());
        assert!(!store.get(1).unwrap().has_changed);
        assert!(!store.get(2).unwrap().has_changed);
    }

    #[test]
    fn diff_touches_exactly_the_changed_ids() {
        let mut store = ElectionStore::new();
        store.apply_snapshot(vec![row(1, "A", 10), row(2, "B", 5), row(3, "C", 7)]);

        let changes = store.apply_snapshot(vec![row(1, "A", 11), row(2, "B", 5), row(3, "C", 7)]);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[&1].votes, 11);
        assert_eq!(store.get(2).unwrap().votes, 5);
        assert_eq!(store.get(3).unwrap().votes, 7);
    }

    #[test]
    fn absent_candidates_are_never_removed() {
        let mut store = ElectionStore::new();
        store.apply_snapshot(vec![row(1, "A", 10), row(2, "B", 5)]);

        let changes = store.apply_snapshot(vec![row(1, "A", 12)]);
        assert_eq!(changes.len(), 1);
        assert_eq!(store.candidate_count(), 2);
        // The absent candidate keeps its last-known value.
        assert_eq!(store.get(2).unwrap().votes, 5);
    }

    #[test]
    fn name_from_first_observation_is_kept() {
        let mut store = ElectionStore::new();
        store.apply_snapshot(vec![row(1, "Alice", 10)]);
        store.apply_snapshot(vec![row(1, "Renamed", 11)]);

        assert_eq!(store.get(1).unwrap().user_name, "Alice");
        assert_eq!(store.get(1).unwrap().votes, 11);
    }

    #[test]
    fn snapshot_is_a_copy() {
        let mut store = ElectionStore::new();
        store.apply_snapshot(vec![row(1, "A", 10)]);

        let mut snapshot = store.snapshot();
        snapshot.get_mut(&1).unwrap().votes = 999;
        assert_eq!(store.get(1).unwrap().votes, 10);
    }
}
