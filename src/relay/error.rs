//! Relay error taxonomy.

use axum::http::StatusCode;
use thiserror::Error;

/// Failures surfaced to the caller by the relay pipeline.
///
/// The `Display` text is the exact plain-text body sent to the caller.
/// Caller input problems map to 400, upstream problems to 502; nothing is
/// retried.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The `url` query parameter was absent or empty.
    #[error("Missing ?url= parameter")]
    MissingParameter,

    /// The `url` query parameter did not parse as an absolute http(s) URL.
    #[error("Invalid URL")]
    InvalidUrl,

    /// The upstream could not be reached or its response could not be read.
    #[error("Proxy error: {0}")]
    Upstream(String),
}

impl RelayError {
    /// HTTP status code emitted for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingParameter | RelayError::InvalidUrl => StatusCode::BAD_REQUEST,
            RelayError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_bodies_match_documented_text() {
        assert_eq!(RelayError::MissingParameter.to_string(), "Missing ?url= parameter");
        assert_eq!(RelayError::InvalidUrl.to_string(), "Invalid URL");
        assert_eq!(
            RelayError::Upstream("connection refused".into()).to_string(),
            "Proxy error: connection refused"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(RelayError::MissingParameter.status(), StatusCode::BAD_REQUEST);
        assert_eq!(RelayError::InvalidUrl.status(), StatusCode::BAD_REQUEST);
        assert_eq!(RelayError::Upstream("x".into()).status(), StatusCode::BAD_GATEWAY);
    }
}
