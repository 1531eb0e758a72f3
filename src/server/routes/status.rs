//! Liveness and status endpoints.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::server::state::AppState;

#[derive(Serialize)]
pub struct StatusResponse {
    pub candidates: usize,
    pub connections: usize,
    pub last_poll: Option<DateTime<Utc>>,
}

/// GET /health - liveness probe.
pub async fn health_check() -> &'static str {
    "OK"
}

/// GET /api/status - scrape and connection counters.
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (candidates, last_poll) = state
        .store
        .read()
        .map(|store| (store.candidate_count(), store.last_poll))
        .unwrap_or((0, None));

    Json(StatusResponse {
        candidates,
        connections: state.registry.len(),
        last_poll,
    })
}
