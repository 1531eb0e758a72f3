//! Data types for election tracking.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One candidate's current standing, as pushed to viewers.
///
/// The serialized field names are part of the wire format; connected clients
/// key on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Numeric user id assigned by the results page.
    #[serde(rename = "UserID")]
    pub user_id: u64,

    /// Display name at the time the candidate was first observed. May be
    /// empty if the name failed to parse.
    #[serde(rename = "UserName")]
    pub user_name: String,

    /// Vote count from the most recent poll.
    #[serde(rename = "Votes")]
    pub votes: u64,

    /// Whether the most recent poll changed this candidate's count.
    #[serde(rename = "HasChanged")]
    pub has_changed: bool,
}

impl Candidate {
    /// Creates a candidate seen for the first time. A first observation
    /// always counts as changed, there being no prior value.
    pub fn new(user_id: u64, user_name: String, votes: u64) -> Self {
        Self {
            user_id,
            user_name,
            votes,
            has_changed: true,
        }
    }
}

/// A candidate row as pulled out of the scraped page, before diffing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    pub id: u64,
    pub name: String,
    pub votes: u64,
}

/// The candidates whose vote count changed, or which were newly observed, in
/// the most recent poll. Produced by one poll, consumed by one broadcast.
pub type ChangeSet = HashMap<u64, Candidate>;
