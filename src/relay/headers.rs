//! Response header filtering.
//!
//! # Responsibilities
//! - Strip headers that would keep the page out of a frame
//! - Strip transport-framing headers describing the original byte stream
//! - Force the relay's own embedding and CORS headers
//!
//! # Design Decisions
//! - The blocked set is a process-wide constant; matching is
//!   case-insensitive
//! - `content-length` is dropped whenever the body is rewritten, since the
//!   rewritten length differs from the original

use axum::http::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_LENGTH, X_FRAME_OPTIONS,
};

/// Upstream response headers never forwarded to the caller.
///
/// The first five block framing or embedding. `content-encoding` and
/// `transfer-encoding` describe the original transport framing, which no
/// longer applies once the fully buffered body is re-framed by the relay's
/// own HTTP layer.
pub const BLOCKED_HEADERS: &[&str] = &[
    "x-frame-options",
    "content-security-policy",
    "content-security-policy-report-only",
    "cross-origin-opener-policy",
    "cross-origin-embedder-policy",
    "content-encoding",
    "transfer-encoding",
];

pub(crate) fn is_header_blocked(name: &str) -> bool {
    BLOCKED_HEADERS.iter().any(|h| name.eq_ignore_ascii_case(h))
}

/// Produce the header set forwarded for one upstream response.
///
/// Upstream ordering is preserved for the headers that survive. The two
/// forced headers override any upstream value.
pub fn filter_headers(upstream: &HeaderMap, body_rewritten: bool) -> HeaderMap {
    let mut forwarded = HeaderMap::with_capacity(upstream.len() + 2);
    for (name, value) in upstream {
        if is_header_blocked(name.as_str()) {
            continue;
        }
        if body_rewritten && *name == CONTENT_LENGTH {
            continue;
        }
        forwarded.append(name.clone(), value.clone());
    }

    forwarded.insert(X_FRAME_OPTIONS, HeaderValue::from_static("ALLOWALL"));
    forwarded.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    forwarded
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::{HeaderName, CONTENT_TYPE};

    fn upstream_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));
        headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
        headers.insert(
            HeaderName::from_static("content-security-policy"),
            HeaderValue::from_static("frame-ancestors 'none'"),
        );
        headers.insert(
            HeaderName::from_static("cross-origin-opener-policy"),
            HeaderValue::from_static("same-origin"),
        );
        headers.insert(
            HeaderName::from_static("content-encoding"),
            HeaderValue::from_static("gzip"),
        );
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("1234"));
        headers.insert(
            HeaderName::from_static("cache-control"),
            HeaderValue::from_static("max-age=60"),
        );
        headers
    }

    #[test]
    fn test_blocked_headers_removed() {
        let filtered = filter_headers(&upstream_headers(), false);
        for name in BLOCKED_HEADERS {
            if *name == "x-frame-options" {
                continue; // re-added with the forced value
            }
            assert!(!filtered.contains_key(*name), "{name} should be stripped");
        }
        assert_eq!(filtered.get(CONTENT_TYPE).unwrap(), "text/html");
        assert_eq!(filtered.get("cache-control").unwrap(), "max-age=60");
    }

    #[test]
    fn test_forced_headers_override_upstream() {
        let filtered = filter_headers(&upstream_headers(), false);
        assert_eq!(filtered.get(X_FRAME_OPTIONS).unwrap(), "ALLOWALL");
        assert_eq!(filtered.get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
    }

    #[test]
    fn test_content_length_dropped_only_when_rewriting() {
        let kept = filter_headers(&upstream_headers(), false);
        assert_eq!(kept.get(CONTENT_LENGTH).unwrap(), "1234");

        let dropped = filter_headers(&upstream_headers(), true);
        assert!(!dropped.contains_key(CONTENT_LENGTH));
    }

    #[test]
    fn test_blocked_matching_is_case_insensitive() {
        assert!(is_header_blocked("X-Frame-Options"));
        assert!(is_header_blocked("Content-Security-Policy-Report-Only"));
        assert!(is_header_blocked("TRANSFER-ENCODING"));
        assert!(!is_header_blocked("content-type"));
    }

    #[test]
    fn test_forced_headers_present_without_upstream_values() {
        let filtered = filter_headers(&HeaderMap::new(), false);
        assert_eq!(filtered.get(X_FRAME_OPTIONS).unwrap(), "ALLOWALL");
        assert_eq!(filtered.get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
    }
}
