//! Error taxonomy.
//!
//! A failed poll is logged and skipped, a failed row is skipped, a failed
//! connection is deregistered. Nothing here terminates the process; the only
//! fatal startup error is failing to bind the listen port, which propagates
//! out of `main`.

use reqwest::StatusCode;

/// A poll's page fetch failed. State is left untouched for the cycle.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport-level failure: DNS, connection refused, timeout.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered, but not with a success status.
    #[error("unexpected status: {0}")]
    Status(StatusCode),
}
