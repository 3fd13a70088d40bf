//! Configuration validation.
//!
//! Serde handles syntax; this checks value ranges and cross-field
//! constraints. All errors are collected, not just the first.

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Validate a configuration, returning every problem found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::new("listener.request_timeout_secs", "must be > 0"));
    }

    if let Err(e) = Url::parse(&config.intake.endpoint()) {
        errors.push(ValidationError::new("intake.url", format!("invalid intake URL: {}", e)));
    }
    if config.intake.timeout_secs == 0 {
        errors.push(ValidationError::new("intake.timeout_secs", "must be > 0"));
    }

    if config.batch.max_entries == 0 {
        errors.push(ValidationError::new("batch.max_entries", "must be > 0"));
    }
    if config.batch.flush_interval_secs == 0 {
        errors.push(ValidationError::new("batch.flush_interval_secs", "must be > 0"));
    }
    if config.batch.max_retained < config.batch.max_entries {
        errors.push(ValidationError::new(
            "batch.max_retained",
            "must be >= batch.max_entries",
        ));
    }

    if config.heartbeat.interval_secs == 0 {
        errors.push(ValidationError::new("heartbeat.interval_secs", "must be > 0"));
    }

    let mock = &config.mock_errors;
    if mock.min_interval_secs > mock.max_interval_secs {
        errors.push(ValidationError::new(
            "mock_errors.min_interval_secs",
            "must be <= mock_errors.max_interval_secs",
        ));
    }
    if mock.history_capacity == 0 {
        errors.push(ValidationError::new("mock_errors.history_capacity", "must be > 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "not a socket address",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
