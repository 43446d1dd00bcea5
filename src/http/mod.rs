//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, both relay routes)
//!     → request.rs (add request ID)
//!     → [relay pipeline runs]
//!     → response.rs (emit status, filtered headers, one body write)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdLayer, X_REQUEST_ID};
pub use server::HttpServer;
