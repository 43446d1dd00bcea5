//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the logging subsystem
//! - Configure the log level from config, overridable via RUST_LOG
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - The request ID flows through handler log events as a field

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("site_relay={level},tower_http={level}"))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
