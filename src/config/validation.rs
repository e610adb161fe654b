//! Configuration validation.
//!
//! Serde handles syntax; this checks values. All failures are collected so
//! an operator sees every problem in one pass.

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::AppConfig;
use crate::store::StoreUri;

pub const MAX_PAGE_SIZE: u64 = 1000;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
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

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if let Err(e) = StoreUri::parse(&config.store.uri) {
        errors.push(ValidationError::new("store.uri", e.to_string()));
    }
    if config.store.timeout_ms == 0 {
        errors.push(ValidationError::new("store.timeout_ms", "must be greater than 0"));
    }

    let page_size = config.pagination.page_size;
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        errors.push(ValidationError::new(
            "pagination.page_size",
            format!("must be between 1 and {}, got {}", MAX_PAGE_SIZE, page_size),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be greater than 0"));
    }
    if config.security.max_field_length == 0 {
        errors.push(ValidationError::new("security.max_field_length", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
