//! votewatch - live election vote monitor.
//!
//! Scrapes the configured results page on a fixed interval and pushes vote
//! changes to connected WebSocket viewers.

use std::sync::Arc;

use votewatch::config::Config;
use votewatch::scrape::spawn_scrape_loop;
use votewatch::server::registry::ConnectionRegistry;
use votewatch::server::state::AppState;
use votewatch::store;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("votewatch=info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!(
        url = %config.scrape.target_url,
        interval_secs = config.scrape.poll_interval.as_secs(),
        port = config.port,
        "Starting votewatch"
    );

    let store = store::shared_store();
    let registry = Arc::new(ConnectionRegistry::new());

    // The loop task runs until the process exits; its handle is not joined.
    let _scraper = spawn_scrape_loop(
        Arc::clone(&store),
        Arc::clone(&registry),
        config.scrape.clone(),
    );

    let state = Arc::new(AppState::new(store, registry));
    votewatch::server::run_server(state, config.port).await?;

    tracing::info!("votewatch has exited");
    Ok(())
}
