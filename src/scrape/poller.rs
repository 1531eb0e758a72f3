//! The scrape loop: fetch, extract, diff, broadcast.
//!
//! One poll either fully applies its extracted snapshot or, on a fetch
//! failure, leaves state untouched. A bad poll never terminates the loop;
//! the service is expected to run unattended for the whole election.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::extract::extract_candidates;
use super::fetch::{build_client, fetch_page};
use crate::server::broadcast::broadcast_changes;
use crate::server::registry::ConnectionRegistry;
use crate::store::{RawCandidate, SharedElectionStore};

/// Configuration for the scrape loop.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Election results page to poll.
    pub target_url: String,

    /// How often to poll (default: 10s). Fixed, not derived from response
    /// time.
    pub poll_interval: Duration,

    /// Hard cap on a single fetch.
    pub request_timeout: Duration,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            target_url: "https://stackoverflow.com/election/11?tab=primary".to_string(),
            poll_interval: Duration::from_secs(10),
            request_timeout: Duration::from_secs(15),
        }
    }
}

/// Spawns the scrape loop task.
///
/// Cycles are strictly serialized: the body of one poll is fully awaited
/// before the next tick fires, and a slow poll delays the schedule instead
/// of stacking ticks.
pub fn spawn_scrape_loop(
    store: SharedElectionStore,
    registry: Arc<ConnectionRegistry>,
    config: ScrapeConfig,
) -> JoinHandle<()> {
    tokio::spawn(run_loop(store, registry, config))
}

async fn run_loop(
    store: SharedElectionStore,
    registry: Arc<ConnectionRegistry>,
    config: ScrapeConfig,
) {
    let client = match build_client(config.request_timeout) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(?e, "Failed to build HTTP client, scrape loop not starting");
            return;
        }
    };

    tracing::info!(
        url = %config.target_url,
        interval_secs = config.poll_interval.as_secs(),
        "Scrape loop started"
    );

    let mut ticker = tokio::time::interval(config.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        poll_cycle(&client, &store, &registry, &config.target_url).await;
    }
}

/// One fetch-extract-diff cycle, broadcasting when anything changed.
async fn poll_cycle(
    client: &reqwest::Client,
    store: &SharedElectionStore,
    registry: &ConnectionRegistry,
    url: &str,
) {
    let body = match fetch_page(client, url).await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(%e, "Poll failed, keeping previous state");
            return;
        }
    };

    let rows: Vec<RawCandidate> = extract_candidates(&body).collect();
    if rows.is_empty() {
        tracing::warn!("Page contained no candidate rows");
    }

    let changes = {
        let Ok(mut store) = store.write() else {
            tracing::error!("Election store lock poisoned, skipping poll");
            return;
        };
        store.apply_snapshot(rows)
    };

    tracing::debug!(changed = changes.len(), "Poll applied");

    if !changes.is_empty() {
        broadcast_changes(registry, &changes);
    }
}
