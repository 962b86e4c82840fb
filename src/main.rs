//! Main entry point for the collaborative editing host.
//!
//! This binary serves a [`NetworkServer`] over HTTP using the Axum web
//! framework.

use std::sync::Arc;

use crdt_lseq::config::Config;
use crdt_lseq::network::NetworkServer;
use crdt_lseq::server::create_router;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    info!(
        base = config.allocator.base,
        boundary = config.allocator.boundary,
        "Starting LSEQ editing host..."
    );

    let network = Arc::new(NetworkServer::with_config(config.allocator)?);
    let app = create_router(network);

    info!("Server listening on http://{}", config.bind_addr);
    info!("Available endpoints:");
    info!("  GET    /health                      - Health check");
    info!("  POST   /replicas                    - Register a replica");
    info!("  GET    /replicas/:site_id           - Render a replica");
    info!("  DELETE /replicas/:site_id           - Deregister a replica");
    info!("  POST   /replicas/:site_id/insert    - Local insert {{index, value}}");
    info!("  POST   /replicas/:site_id/erase     - Local erase {{index}}");
    info!("  POST   /replicas/:site_id/messages  - Apply a wire message");
    info!("  POST   /dispatch                    - Deliver pending messages");

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
