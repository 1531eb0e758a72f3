//! HTTP server module for the viewer page and WebSocket endpoint.
//!
//! Serves the static viewer page, upgrades `/ws` connections, and exposes a
//! small status API for frontends.

pub mod broadcast;
pub mod registry;
pub mod routes;
pub mod state;
pub mod ws;

use crate::server::routes::status::{get_status, health_check};
use crate::server::state::AppState;
use crate::server::ws::ws_handler;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeFile;

/// Default server port.
pub const DEFAULT_PORT: u16 = 8080;

/// Builds the application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    // CORS layer for frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Viewer page
        .route_service("/", ServeFile::new("static/index.html"))
        // Health + status
        .route("/health", get(health_check))
        .route("/api/status", get(get_status))
        // WebSocket
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(state)
}

/// Binds the listen port and serves until shutdown.
///
/// A bind failure is the one startup error the process does not survive; it
/// propagates to the caller instead of being logged away.
pub async fn run_server(state: Arc<AppState>, port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(?e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
