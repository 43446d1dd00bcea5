//! Embedding relay server binary.

use std::path::Path;

use tokio::net::TcpListener;

use site_relay::config::{load_or_default, RelayConfig};
use site_relay::lifecycle::Shutdown;
use site_relay::observability::{logging, metrics};
use site_relay::HttpServer;

/// Config file consulted when present; defaults apply otherwise.
const CONFIG_PATH: &str = "relay.toml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config: RelayConfig = load_or_default(Path::new(CONFIG_PATH))?;

    logging::init_logging(&config.observability.log_level);

    tracing::info!("site-relay v0.1.0 starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        route = %config.rewrite.route,
        rewrite_links = config.rewrite.rewrite_links,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
