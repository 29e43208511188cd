//! Configuration validation.
//!
//! Semantic validation only; serde handles syntactic errors. Returns all
//! validation errors, not just the first, so a broken config can be fixed
//! in one pass. A malformed `api_base_url` is deliberately NOT an error
//! here: the pipeline substitutes a safe default origin at runtime and the
//! policy builder logs a warning instead.

use std::net::SocketAddr;

use axum::http::uri::Authority;
use thiserror::Error;

use crate::config::schema::EdgeConfig;

/// A single semantic configuration error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid listener bind address: {0}")]
    InvalidBindAddress(String),

    #[error("invalid metrics address: {0}")]
    InvalidMetricsAddress(String),

    #[error("invalid upstream render address: {0}")]
    InvalidRenderAddress(String),

    #[error("request timeout must be greater than zero")]
    ZeroRequestTimeout,

    #[error("max body size must be greater than zero")]
    ZeroBodySize,

    #[error("theme cookie name must not be empty")]
    EmptyCookieName,
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &EdgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.upstream.render_address.parse::<Authority>().is_err() {
        errors.push(ValidationError::InvalidRenderAddress(
            config.upstream.render_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodySize);
    }

    if config.theme.cookie_name.is_empty() {
        errors.push(ValidationError::EmptyCookieName);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
