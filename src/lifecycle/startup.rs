//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize metrics when an exporter address is configured
//! - Build the backend clients from validated configuration
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: a bad backend address or a busy port is fatal
//! - A metrics exporter that fails to start is logged, not fatal
//! - Subsystems initialize in order, not concurrently

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::backend::{BackendError, HttpCacheClient, HttpEmojifyClient};
use crate::config::{ApiConfig, ConfigError};
use crate::http::{AppState, HttpServer};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to create backend client: {0}")]
    Backend(#[from] BackendError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Build the shared handler state from configuration.
pub fn build_state(config: &ApiConfig) -> Result<AppState, StartupError> {
    let backends = &config.backends;
    let emojify = HttpEmojifyClient::new(&backends.emojify_address, backends.timeout)?;
    let cache = HttpCacheClient::new(&backends.cache_address, backends.timeout)?;

    Ok(AppState {
        emojify: Arc::new(emojify),
        cache: Arc::new(cache),
        health_timeout: backends.health_timeout,
    })
}

/// Start every subsystem and serve until `shutdown` fires.
pub async fn run(config: ApiConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        mount_path = %config.listener.mount_path,
        emojify_address = %config.backends.emojify_address,
        cache_address = %config.backends.cache_address,
        backend_timeout = ?config.backends.timeout,
        allowed_origin = %config.cors.allowed_origin,
        "Configuration loaded"
    );

    if let Some(address) = &config.observability.metrics_address {
        match address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(address = %addr, error = %e, "Failed to start metrics exporter");
                }
            }
            Err(e) => {
                tracing::error!(address = %address, error = %e, "Failed to parse metrics address");
            }
        }
    }

    let state = build_state(&config)?;
    let server = HttpServer::new(config, state);

    let address = server.config().listener.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    server
        .run(listener, shutdown.subscribe())
        .await
        .map_err(StartupError::Serve)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_state_uses_health_timeout() {
        let mut config = ApiConfig::default();
        config.backends.health_timeout = std::time::Duration::from_millis(250);

        let state = build_state(&config).unwrap();
        assert_eq!(state.health_timeout, std::time::Duration::from_millis(250));
    }

    #[test]
    fn test_build_state_rejects_bad_address() {
        let mut config = ApiConfig::default();
        config.backends.cache_address = "ftp://cache".to_string();

        let err = build_state(&config).err().unwrap();
        assert!(matches!(err, StartupError::Backend(BackendError::InvalidAddress { .. })));
    }

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut config = ApiConfig::default();
        config.listener.bind_address = taken.local_addr().unwrap().to_string();

        let err = run(config, &Shutdown::new()).await.unwrap_err();
        assert!(matches!(err, StartupError::Bind { .. }));
    }
}
