//! Response emission.
//!
//! # Responsibilities
//! - Translate the relay's host-agnostic output into an Axum response
//! - Map relay errors to their documented status and plain-text body
//! - Recover from handler panics without leaking a framework 500
//!
//! # Design Decisions
//! - Upstream status is mirrored unchanged; the forwarded header set
//!   replaces the response headers wholesale
//! - Exactly one body write; the body is already fully buffered

use std::any::Any;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Response};
use axum::response::IntoResponse;

use crate::relay::{RelayError, RelayResponse};

impl IntoResponse for RelayResponse {
    fn into_response(self) -> axum::response::Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let mut response = Response::new(Body::from(self.to_string()));
        *response.status_mut() = status;
        response.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        response
    }
}

/// Convert a panic escaping the handler into a 502.
///
/// An unexpected failure while transforming an upstream response is
/// reported like any other upstream problem, not as a framework 500.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> axum::response::Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %details, "Relay handler panicked");
    RelayError::Upstream(format!("internal relay failure: {details}")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_error_responses_carry_documented_bodies() {
        let response = RelayError::MissingParameter.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = RelayError::Upstream("dns failure".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn test_panic_surfaces_as_proxy_error() {
        let response = handle_panic(Box::new("boom".to_string()));
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
