//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the relay handler on both route paths
//! - Wire up middleware (tracing, timeout, request ID, panic recovery)
//! - Derive the relay's externally visible base URL per request
//! - Serve with graceful shutdown
//!
//! # Data Flow
//! The two historical hosting bindings (serverless function and embedded
//! dev middleware) collapse into one handler mounted at both paths; the
//! handler is a thin adapter around [`Relay::handle`].

use std::time::{Duration, Instant};

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use url::Url;

use crate::config::RelayConfig;
use crate::http::request::{RequestIdLayer, X_REQUEST_ID};
use crate::http::response::handle_panic;
use crate::observability::metrics;
use crate::relay::Relay;

/// Application state injected into handlers.
///
/// Everything here is read-only; concurrent calls share it without
/// synchronization.
#[derive(Clone)]
pub struct AppState {
    pub relay: Relay,
    pub public_base_url: Option<Url>,
    pub fallback_base_url: Url,
}

/// HTTP server hosting the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Self {
        let relay = Relay::new(&config);
        let public_base_url = config
            .rewrite
            .public_base_url
            .as_deref()
            .and_then(|raw| Url::parse(raw).ok());
        let fallback_base_url = fallback_base(&config);

        let state = AppState {
            relay,
            public_base_url,
            fallback_base_url,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        Router::new()
            .route("/api/fetch-site", get(relay_handler))
            .route("/fetch-site", get(relay_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until Ctrl+C or the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

#[derive(Debug, Deserialize)]
struct RelayParams {
    url: Option<String>,
}

/// Relay handler shared by both route paths.
async fn relay_handler(
    State(state): State<AppState>,
    Query(params): Query<RelayParams>,
    headers: HeaderMap,
) -> Response {
    let start_time = Instant::now();
    let request_id = headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let relay_base = state
        .public_base_url
        .clone()
        .or_else(|| host_base_url(&headers))
        .unwrap_or_else(|| state.fallback_base_url.clone());

    match state.relay.handle(params.url.as_deref(), &relay_base).await {
        Ok(relayed) => {
            let status = relayed.status;
            tracing::info!(
                request_id = %request_id,
                status = %status,
                "Relayed upstream response"
            );
            metrics::record_request("GET", status.as_u16(), start_time);
            relayed.into_response()
        }
        Err(error) => {
            let status = error.status();
            tracing::warn!(
                request_id = %request_id,
                status = %status,
                error = %error,
                "Relay request failed"
            );
            metrics::record_request("GET", status.as_u16(), start_time);
            error.into_response()
        }
    }
}

/// Base URL implied by the inbound request's own Host header.
fn host_base_url(headers: &HeaderMap) -> Option<Url> {
    let host = headers.get(header::HOST)?.to_str().ok()?;
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    Url::parse(&format!("{scheme}://{host}")).ok()
}

/// Last-resort base URL when the inbound request carries no usable Host.
fn fallback_base(config: &RelayConfig) -> Url {
    Url::parse(&format!("http://{}", config.listener.bind_address))
        .unwrap_or_else(|_| Url::parse("http://localhost").unwrap())
}

/// Wait for Ctrl+C or an explicit shutdown trigger.
async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
        _ = shutdown.recv() => {
            tracing::info!("Shutdown triggered");
        }
    }
}
