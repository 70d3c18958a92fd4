//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (rate in [0, 1], timeouts > 0, status codes)
//! - Check backend addresses are usable base URLs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ApiConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::time::Duration;

use axum::http::{HeaderValue, StatusCode};

use crate::backend::client::parse_base_url;
use crate::config::schema::ApiConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

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

/// Check a loaded configuration, collecting every problem found.
pub fn validate_config(config: &ApiConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.is_empty() {
        errors.push(ValidationError::new("listener.bind_address", "must not be empty"));
    }
    if !config.listener.mount_path.starts_with('/') {
        errors.push(ValidationError::new("listener.mount_path", "must start with '/'"));
    }
    if config.listener.max_body_size == 0 {
        errors.push(ValidationError::new("listener.max_body_size", "must be greater than zero"));
    }
    check_positive(&mut errors, "listener.request_timeout", config.listener.request_timeout);

    for (field, address) in [
        ("backends.emojify_address", &config.backends.emojify_address),
        ("backends.cache_address", &config.backends.cache_address),
    ] {
        if let Err(message) = parse_base_url(address) {
            errors.push(ValidationError::new(field, message));
        }
    }
    check_positive(&mut errors, "backends.timeout", config.backends.timeout);
    check_positive(&mut errors, "backends.health_timeout", config.backends.health_timeout);

    let origin = &config.cors.allowed_origin;
    if origin != "*" && HeaderValue::from_str(origin).is_err() {
        errors.push(ValidationError::new("cors.allowed_origin", "is not a valid header value"));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unrecognised level '{}'", config.observability.log_level),
        ));
    }
    if let Some(addr) = &config.observability.metrics_address {
        if addr.parse::<std::net::SocketAddr>().is_err() {
            errors.push(ValidationError::new(
                "observability.metrics_address",
                format!("'{}' is not a socket address", addr),
            ));
        }
    }

    let faults = &config.fault_injection;
    if !faults.rate.is_finite() || !(0.0..=1.0).contains(&faults.rate) {
        errors.push(ValidationError::new(
            "fault_injection.rate",
            format!("{} is outside [0, 1]", faults.rate),
        ));
    }
    if !(100..=599).contains(&faults.error_code) || StatusCode::from_u16(faults.error_code).is_err() {
        errors.push(ValidationError::new(
            "fault_injection.error_code",
            format!("{} is not an HTTP status code", faults.error_code),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_positive(errors: &mut Vec<ValidationError>, field: &'static str, value: Duration) {
    if value.is_zero() {
        errors.push(ValidationError::new(field, "must be greater than zero"));
    }
}
