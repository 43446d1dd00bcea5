//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, the route path, and the public base URL
//! - Catch request-profile values that cannot be sent as headers
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use axum::http::HeaderValue;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Config field the failure refers to.
    pub field: &'static str,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, returning every violation found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "listener.bind_address",
            message: format!("not a socket address: {:?}", config.listener.bind_address),
        });
    }

    if !config.rewrite.route.starts_with('/') {
        errors.push(ValidationError {
            field: "rewrite.route",
            message: format!("must start with '/': {:?}", config.rewrite.route),
        });
    }

    if let Some(base) = &config.rewrite.public_base_url {
        match Url::parse(base) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() => {}
            _ => errors.push(ValidationError {
                field: "rewrite.public_base_url",
                message: format!("not an absolute http(s) URL: {base:?}"),
            }),
        }
    }

    for (field, value) in [
        ("upstream.user_agent", &config.upstream.user_agent),
        ("upstream.accept", &config.upstream.accept),
        ("upstream.accept_language", &config.upstream.accept_language),
    ] {
        if HeaderValue::from_str(value).is_err() {
            errors.push(ValidationError {
                field,
                message: "not a valid header value".to_string(),
            });
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError {
            field: "timeouts.request_secs",
            message: "must be greater than zero".to_string(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError {
            field: "observability.metrics_address",
            message: format!(
                "not a socket address: {:?}",
                config.observability.metrics_address
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&RelayConfig::default()).is_ok());
    }

    #[test]
    fn test_all_errors_reported() {
        let mut config = RelayConfig::default();
        config.listener.bind_address = "nope".into();
        config.rewrite.route = "fetch-site".into();
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert!(fields.contains(&"listener.bind_address"));
        assert!(fields.contains(&"rewrite.route"));
        assert!(fields.contains(&"timeouts.request_secs"));
    }

    #[test]
    fn test_public_base_url_must_be_absolute_http() {
        let mut config = RelayConfig::default();
        config.rewrite.public_base_url = Some("relay.dev".into());
        assert!(validate_config(&config).is_err());

        config.rewrite.public_base_url = Some("https://relay.dev".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_request_profile_must_be_header_safe() {
        let mut config = RelayConfig::default();
        config.upstream.user_agent = "bad\nagent".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "upstream.user_agent");
    }
}
