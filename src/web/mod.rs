//! Axum webserver
//!
//! Builds the shared state from a `ServerConfig`, binds the listener, and
//! serves until Ctrl-C.

pub mod error;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;

use log::{error, info};
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::cache::TtlCache;
use crate::cli::ServerConfig;
use crate::data::{ContentService, HiveClient};

/// Wires the Hive client, cache, and content service together
pub fn build_state(config: &ServerConfig) -> Arc<AppState> {
    let source = Arc::new(HiveClient::new(config.nodes.clone()));
    let cache = Arc::new(TtlCache::with_ttl(config.cache_ttl));
    let content = ContentService::new(source, cache, config.fetch.clone());
    Arc::new(AppState::new(content))
}

/// Start the webserver
///
/// This function blocks until the server is shut down
pub async fn start_server(config: ServerConfig) -> std::io::Result<()> {
    let state = build_state(&config);
    let app = create_router(state);

    let listener = TcpListener::bind(config.bind).await.map_err(|e| {
        error!("Failed to bind to {}: {}", config.bind, e);
        e
    })?;

    info!("Server listening at http://{}", listener.local_addr()?);
    info!(
        "Community {} via {} (cache TTL {}s, {} attempts, {}ms apart)",
        config.fetch.community_tag,
        config.nodes.first().map(String::as_str).unwrap_or("-"),
        config.cache_ttl.num_seconds(),
        config.fetch.retry.max_retries,
        config.fetch.retry.delay.as_millis(),
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        // Without a signal handler, run until the process is killed
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal, stopping server...");
}
