//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::duration;

/// Root configuration for the emojify API gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Listener configuration (bind address, mount path, limits).
    pub listener: ListenerConfig,

    /// Addresses and timeouts for the emojify and cache services.
    pub backends: BackendsConfig,

    /// Cross-origin settings applied to every route.
    pub cors: CorsConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,

    /// Synthetic failures injected into the cache route.
    pub fault_injection: FaultInjectionConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "localhost:9090").
    pub bind_address: String,

    /// Path the API is mounted under. Always ends in `/` once loaded.
    pub mount_path: String,

    /// Upper bound on the total time spent serving one request.
    #[serde(with = "duration")]
    pub request_timeout: Duration,

    /// Maximum accepted request body in bytes.
    pub max_body_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "localhost:9090".to_string(),
            mount_path: "/".to_string(),
            request_timeout: Duration::from_secs(30),
            max_body_size: 64 * 1024,
        }
    }
}

impl ListenerConfig {
    /// Make sure the mount path ends in a `/`.
    pub fn normalize_mount_path(&mut self) {
        if !self.mount_path.ends_with('/') {
            self.mount_path.push('/');
        }
    }

    /// Mount path without its trailing slash, ready to prefix route paths.
    pub fn route_prefix(&self) -> &str {
        self.mount_path.trim_end_matches('/')
    }
}

/// Backend service configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BackendsConfig {
    /// Base URL of the emojify service.
    pub emojify_address: String,

    /// Base URL of the cache service.
    pub cache_address: String,

    /// Timeout applied to every backend call.
    #[serde(with = "duration")]
    pub timeout: Duration,

    /// Timeout for each reachability probe made by the health endpoint.
    #[serde(with = "duration")]
    pub health_timeout: Duration,
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            emojify_address: "http://localhost:9091".to_string(),
            cache_address: "http://localhost:9092".to_string(),
            timeout: Duration::from_millis(3000),
            health_timeout: Duration::from_secs(1),
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origin. `*` reflects the caller's origin.
    pub allowed_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: "*".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}', expected text or json", other)),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Prometheus scrape endpoint bind address. Metrics are off when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            metrics_address: None,
        }
    }
}

/// What an injected fault does to a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// Answer with the configured status code without calling the handler.
    #[default]
    HttpError,
    /// Sleep for the configured delay, then call the handler.
    Delay,
}

impl FaultKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultKind::HttpError => "http_error",
            FaultKind::Delay => "delay",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FaultKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http_error" => Ok(FaultKind::HttpError),
            "delay" => Ok(FaultKind::Delay),
            other => Err(format!(
                "unknown error type '{}', expected http_error or delay",
                other
            )),
        }
    }
}

/// Fault injection settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FaultInjectionConfig {
    /// Fraction of requests to corrupt, in `[0, 1]`. Zero disables injection.
    pub rate: f64,

    /// Kind of fault to inject.
    pub error_type: FaultKind,

    /// Status code returned by `http_error` faults.
    pub error_code: u16,

    /// Latency added by `delay` faults.
    #[serde(with = "duration")]
    pub error_delay: Duration,
}

impl Default for FaultInjectionConfig {
    fn default() -> Self {
        Self {
            rate: 0.0,
            error_type: FaultKind::HttpError,
            error_code: 500,
            error_delay: Duration::ZERO,
        }
    }
}

impl FaultInjectionConfig {
    pub fn is_enabled(&self) -> bool {
        self.rate > 0.0
    }
}
