//! Embedding relay library.
//!
//! A single-hop HTTP relay that fetches a caller-specified page, strips
//! the response headers that would keep it out of a frame, and rewrites
//! the HTML so relative sub-resources and same-origin navigation keep
//! resolving through the relay.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                 EMBEDDING RELAY               │
//!                      │                                               │
//!   GET ?url=…         │  ┌─────────┐   ┌──────────┐   ┌───────────┐  │
//!   ──────────────────▶│  │  http   │──▶│  relay/  │──▶│  relay/   │──┼──▶ Upstream
//!                      │  │ server  │   │ target   │   │  fetch    │  │    Server
//!                      │  └─────────┘   └──────────┘   └─────┬─────┘  │
//!                      │                                     │        │
//!                      │                                     ▼        │
//!   framed page        │  ┌─────────┐   ┌──────────┐   ┌───────────┐  │
//!   ◀──────────────────┼──│  http   │◀──│  relay/  │◀──│  relay/   │  │
//!                      │  │response │   │ rewrite  │   │  headers  │  │
//!                      │  └─────────┘   └──────────┘   └───────────┘  │
//!                      │                                               │
//!                      │  ┌─────────────────────────────────────────┐  │
//!                      │  │          Cross-Cutting Concerns          │  │
//!                      │  │  config · observability · lifecycle      │  │
//!                      │  └─────────────────────────────────────────┘  │
//!                      └──────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod relay;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use relay::Relay;
