//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, sampling parameters)
//! - Check that upstream locations are absolute URLs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use axum::http::HeaderValue;
use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::ServiceConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    check_url(&mut errors, "football_data.base_url", &config.football_data.base_url);
    check_url(&mut errors, "crests.trusted_prefix", &config.crests.trusted_prefix);
    check_url(&mut errors, "gemini.base_url", &config.gemini.base_url);

    let timeouts = [
        ("timeouts.connect_secs", config.timeouts.connect_secs),
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("football_data.timeout_secs", config.football_data.timeout_secs),
        ("crests.timeout_secs", config.crests.timeout_secs),
        ("gemini.timeout_secs", config.gemini.timeout_secs),
    ];
    for (field, secs) in timeouts {
        if secs == 0 {
            errors.push(ValidationError::new(field, "must be greater than zero"));
        }
    }

    if config.gemini.model.trim().is_empty() {
        errors.push(ValidationError::new("gemini.model", "must not be empty"));
    }
    if config.gemini.max_output_tokens == 0 {
        errors.push(ValidationError::new("gemini.max_output_tokens", "must be greater than zero"));
    }
    if !(0.0..=2.0).contains(&config.gemini.temperature) {
        errors.push(ValidationError::new("gemini.temperature", "must be within 0.0..=2.0"));
    }
    if !(config.gemini.top_p > 0.0 && config.gemini.top_p <= 1.0) {
        errors.push(ValidationError::new("gemini.top_p", "must be within (0.0, 1.0]"));
    }

    if config.cors.production_origin.trim().is_empty() {
        errors.push(ValidationError::new("cors.production_origin", "must not be empty"));
    } else if HeaderValue::from_str(&config.cors.production_origin).is_err() {
        errors.push(ValidationError::new(
            "cors.production_origin",
            format!("'{}' is not a valid header value", config.cors.production_origin),
        ));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be greater than zero"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    match Url::parse(value) {
        Ok(url) if url.has_host() => {}
        Ok(_) => errors.push(ValidationError::new(field, format!("'{}' has no host", value))),
        Err(e) => errors.push(ValidationError::new(field, format!("'{}' is not a URL: {}", value, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ServiceConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ServiceConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.crests.trusted_prefix = "crests".into();
        config.football_data.timeout_secs = 0;
        config.gemini.top_p = 0.0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "crests.trusted_prefix",
                "football_data.timeout_secs",
                "gemini.top_p",
            ]
        );
    }

    #[test]
    fn test_rejects_origin_that_cannot_be_a_header() {
        let mut config = ServiceConfig::default();
        config.cors.production_origin = "https://onlysports.vercel.app\r\nX-Injected: 1".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "cors.production_origin");
    }
}
