//! The relay pipeline.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → target.rs (validate ?url=)
//!     → fetch.rs (browser-profile GET, redirects followed, body buffered)
//!     → headers.rs (strip framing/transport headers, force overrides)
//!     → rewrite.rs (HTML only: base injection, optional link rewrite)
//!     → RelayResponse (status mirrored, one body write)
//! ```
//!
//! # Design Decisions
//! - The relay is a pure function of (request, fetch client); no state is
//!   shared between calls beyond the immutable header policy
//! - Hosting adapters translate their request/response shapes at the edge;
//!   the pipeline itself never sees the host framework

pub mod error;
pub mod fetch;
pub mod headers;
pub mod rewrite;
pub mod target;

pub use error::RelayError;
pub use fetch::{UpstreamBody, UpstreamFetcher, UpstreamResponse};
pub use rewrite::RewriteContext;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use url::Url;

use crate::config::{RelayConfig, RewriteConfig};

/// Host-agnostic response produced by one relay call.
#[derive(Debug)]
pub struct RelayResponse {
    /// Upstream status, mirrored unchanged.
    pub status: StatusCode,
    /// Filtered and augmented headers.
    pub headers: HeaderMap,
    /// The complete body; written exactly once.
    pub body: Vec<u8>,
}

/// Stateless relay handler shared read-only across concurrent calls.
#[derive(Debug, Clone)]
pub struct Relay {
    fetcher: UpstreamFetcher,
    options: RewriteConfig,
}

impl Relay {
    /// Build a relay from the loaded configuration.
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            fetcher: UpstreamFetcher::new(&config.upstream),
            options: config.rewrite.clone(),
        }
    }

    /// Run the full pipeline for one inbound request.
    ///
    /// `target` is the raw `url` query parameter; `relay_base` is the
    /// externally visible base URL rewritten links point back at.
    pub async fn handle(
        &self,
        target: Option<&str>,
        relay_base: &Url,
    ) -> Result<RelayResponse, RelayError> {
        let target = target::parse_target(target)?;
        tracing::debug!(target = %target, "Relaying request");

        let upstream = self.fetcher.fetch(&target).await?;
        let rewrite_body = upstream.is_html();
        let mut headers = headers::filter_headers(&upstream.headers, rewrite_body);

        let body = match upstream.body {
            UpstreamBody::Text(html) => {
                let ctx = RewriteContext::new(
                    upstream.final_url.clone(),
                    relay_base,
                    &self.options.route,
                );
                let rewritten = rewrite::rewrite_document(&html, &ctx, self.options.rewrite_links);
                headers.insert(
                    CONTENT_TYPE,
                    HeaderValue::from_static("text/html; charset=utf-8"),
                );
                rewritten.into_bytes()
            }
            UpstreamBody::Bytes(bytes) => bytes,
        };

        tracing::debug!(
            status = %upstream.status,
            final_url = %upstream.final_url,
            rewritten = rewrite_body,
            "Upstream response relayed"
        );

        Ok(RelayResponse {
            status: upstream.status,
            headers,
            body,
        })
    }
}
