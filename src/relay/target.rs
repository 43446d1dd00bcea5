//! Target URL validation.
//!
//! # Responsibilities
//! - Accept the raw `url` query parameter
//! - Reject absent/empty values and anything that is not an absolute
//!   http(s) URL
//! - Preserve scheme, host, path and query verbatim for the fetch step
//!
//! # Design Decisions
//! - Validation is a pure function with no side effects
//! - Only network schemes are relayed; `file:`, `data:` and friends are
//!   caller errors, not upstream errors

use url::Url;

use crate::relay::error::RelayError;

/// Parse and validate the `url` query parameter into a fetchable target.
pub fn parse_target(raw: Option<&str>) -> Result<Url, RelayError> {
    let raw = match raw {
        Some(value) if !value.trim().is_empty() => value.trim(),
        _ => return Err(RelayError::MissingParameter),
    };

    let target = Url::parse(raw).map_err(|_| RelayError::InvalidUrl)?;
    if !matches!(target.scheme(), "http" | "https") || target.host_str().is_none() {
        return Err(RelayError::InvalidUrl);
    }

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameter() {
        assert!(matches!(parse_target(None), Err(RelayError::MissingParameter)));
        assert!(matches!(parse_target(Some("")), Err(RelayError::MissingParameter)));
        assert!(matches!(parse_target(Some("   ")), Err(RelayError::MissingParameter)));
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(parse_target(Some("not a url")), Err(RelayError::InvalidUrl)));
        assert!(matches!(parse_target(Some("/relative/path")), Err(RelayError::InvalidUrl)));
        assert!(matches!(parse_target(Some("ftp://example.com/f")), Err(RelayError::InvalidUrl)));
        assert!(matches!(parse_target(Some("javascript:alert(1)")), Err(RelayError::InvalidUrl)));
        assert!(matches!(parse_target(Some("data:text/html,hi")), Err(RelayError::InvalidUrl)));
    }

    #[test]
    fn test_valid_targets() {
        let target = parse_target(Some("https://example.com/page?q=1")).unwrap();
        assert_eq!(target.scheme(), "https");
        assert_eq!(target.host_str(), Some("example.com"));
        assert_eq!(target.path(), "/page");
        assert_eq!(target.query(), Some("q=1"));

        assert!(parse_target(Some("http://localhost:3000/")).is_ok());
    }
}
