//! Process lifecycle management.
//!
//! # Design Decisions
//! - Shutdown is cooperative: a broadcast signal observed by the server's
//!   graceful-shutdown future alongside Ctrl+C

pub mod shutdown;

pub use shutdown::Shutdown;
