//! Upstream fetching.
//!
//! # Responsibilities
//! - Issue one outbound GET per relay call with the fixed browser-like
//!   request profile
//! - Follow redirects transparently and expose the final URL
//! - Buffer the complete body before returning
//!
//! # Design Decisions
//! - `Accept-Encoding: identity` is mandatory: the relay strips the
//!   original `Content-Encoding` downstream, so the body it buffers must
//!   never be compressed in the first place
//! - HTML bodies are decoded to text using the upstream-declared charset;
//!   everything else stays raw bytes
//! - No retries; a single failure surfaces immediately as 502

use axum::http::{HeaderMap, StatusCode};
use reqwest::header::{ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CONTENT_TYPE, USER_AGENT};
use url::Url;

use crate::config::UpstreamConfig;
use crate::relay::error::RelayError;

/// Fully buffered upstream body.
#[derive(Debug, Clone)]
pub enum UpstreamBody {
    /// Decoded text of an HTML response.
    Text(String),
    /// Raw bytes of any other response.
    Bytes(Vec<u8>),
}

/// One upstream response, owned by the relay for the duration of a call.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    /// Status code as returned by the final upstream response.
    pub status: StatusCode,
    /// URL after all redirects; rewriting keys off this, not the original.
    pub final_url: Url,
    /// Headers as returned by the upstream, in order.
    pub headers: HeaderMap,
    /// Lowercased `content-type` value, empty when absent.
    pub content_type: String,
    /// The buffered body.
    pub body: UpstreamBody,
}

impl UpstreamResponse {
    /// Whether the body goes through the HTML rewrite step.
    pub fn is_html(&self) -> bool {
        self.content_type.contains("text/html")
    }
}

/// Outbound HTTP client carrying the fixed browser-like request profile.
#[derive(Debug, Clone)]
pub struct UpstreamFetcher {
    client: reqwest::Client,
    profile: UpstreamConfig,
}

impl UpstreamFetcher {
    /// Create a fetcher with the configured request profile.
    pub fn new(profile: &UpstreamConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            profile: profile.clone(),
        }
    }

    /// Fetch the target and buffer the complete response.
    ///
    /// Any network-level failure (DNS, refused connection, malformed
    /// response, body read error) maps to [`RelayError::Upstream`].
    pub async fn fetch(&self, target: &Url) -> Result<UpstreamResponse, RelayError> {
        let response = self
            .client
            .get(target.clone())
            .header(USER_AGENT, &self.profile.user_agent)
            .header(ACCEPT, &self.profile.accept)
            .header(ACCEPT_LANGUAGE, &self.profile.accept_language)
            .header(ACCEPT_ENCODING, "identity")
            .send()
            .await
            .map_err(|e| RelayError::Upstream(e.to_string()))?;

        let status = response.status();
        let final_url = response.url().clone();
        let headers = response.headers().clone();
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        let body = if content_type.contains("text/html") {
            let text = response
                .text()
                .await
                .map_err(|e| RelayError::Upstream(e.to_string()))?;
            UpstreamBody::Text(text)
        } else {
            let bytes = response
                .bytes()
                .await
                .map_err(|e| RelayError::Upstream(e.to_string()))?;
            UpstreamBody::Bytes(bytes.to_vec())
        };

        tracing::debug!(
            status = %status,
            final_url = %final_url,
            content_type = %content_type,
            "Upstream response buffered"
        );

        Ok(UpstreamResponse {
            status,
            final_url,
            headers,
            content_type,
            body,
        })
    }
}
