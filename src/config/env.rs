//! Environment variable overrides.
//!
//! Every setting can be overridden by an environment variable. Lookups go
//! through a caller-supplied function so tests never touch the process
//! environment.

use std::str::FromStr;

use crate::config::duration;
use crate::config::loader::ConfigError;
use crate::config::schema::ApiConfig;

/// Help text listing the supported environment variables.
pub const ENV_HELP: &str = "\
Configuration values are set using environment variables:

  BIND_ADDRESS       Bind address for the server [default: localhost:9090]
  MOUNT_PATH         Path to mount the API under [default: /]
  ALLOW_ORIGIN       CORS allowed origin [default: *]
  EMOJIFY_ADDRESS    Base URL of the emojify service [default: http://localhost:9091]
  CACHE_ADDRESS      Base URL of the cache service [default: http://localhost:9092]
  BACKEND_TIMEOUT    Timeout for backend calls [default: 3s]
  HEALTH_TIMEOUT     Timeout for each health probe [default: 1s]
  REQUEST_TIMEOUT    Timeout for a whole request [default: 30s]
  MAX_BODY_SIZE      Maximum request body in bytes [default: 65536]
  LOG_LEVEL          Log output level [trace,debug,info,warn,error] [default: info]
  LOG_FORMAT         Log output format [text,json] [default: text]
  METRICS_ADDRESS    Prometheus endpoint bind address, empty disables [default: disabled]
  CACHE_ERROR_RATE   Fraction of cache requests that fail, 0 to 1 [default: 0]
  CACHE_ERROR_TYPE   Type of error [http_error,delay] [default: http_error]
  CACHE_ERROR_CODE   Status code returned on injected errors [default: 500]
  CACHE_ERROR_DELAY  Delay added by injected delays [1s,100ms] [default: 0s]";

/// Apply environment overrides to `config`.
pub fn apply_env_overrides<F>(config: &mut ApiConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |var: &str| lookup(var).map(|v| v.trim().to_string());

    if let Some(v) = get("BIND_ADDRESS") {
        config.listener.bind_address = v;
    }
    if let Some(v) = get("MOUNT_PATH") {
        config.listener.mount_path = v;
    }
    if let Some(v) = get("ALLOW_ORIGIN") {
        config.cors.allowed_origin = v;
    }
    if let Some(v) = get("EMOJIFY_ADDRESS") {
        config.backends.emojify_address = v;
    }
    if let Some(v) = get("CACHE_ADDRESS") {
        config.backends.cache_address = v;
    }
    if let Some(v) = get("BACKEND_TIMEOUT") {
        config.backends.timeout = parse_duration("BACKEND_TIMEOUT", &v)?;
    }
    if let Some(v) = get("HEALTH_TIMEOUT") {
        config.backends.health_timeout = parse_duration("HEALTH_TIMEOUT", &v)?;
    }
    if let Some(v) = get("REQUEST_TIMEOUT") {
        config.listener.request_timeout = parse_duration("REQUEST_TIMEOUT", &v)?;
    }
    if let Some(v) = get("MAX_BODY_SIZE") {
        config.listener.max_body_size = parse("MAX_BODY_SIZE", &v)?;
    }
    if let Some(v) = get("LOG_LEVEL") {
        config.observability.log_level = v;
    }
    if let Some(v) = get("LOG_FORMAT") {
        config.observability.log_format = parse("LOG_FORMAT", &v)?;
    }
    if let Some(v) = get("METRICS_ADDRESS") {
        config.observability.metrics_address = if v.is_empty() { None } else { Some(v) };
    }
    if let Some(v) = get("CACHE_ERROR_RATE") {
        config.fault_injection.rate = parse("CACHE_ERROR_RATE", &v)?;
    }
    if let Some(v) = get("CACHE_ERROR_TYPE") {
        config.fault_injection.error_type = parse("CACHE_ERROR_TYPE", &v)?;
    }
    if let Some(v) = get("CACHE_ERROR_CODE") {
        config.fault_injection.error_code = parse("CACHE_ERROR_CODE", &v)?;
    }
    if let Some(v) = get("CACHE_ERROR_DELAY") {
        config.fault_injection.error_delay = parse_duration("CACHE_ERROR_DELAY", &v)?;
    }

    Ok(())
}

fn parse<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::Env {
        var,
        message: e.to_string(),
    })
}

fn parse_duration(var: &'static str, raw: &str) -> Result<std::time::Duration, ConfigError> {
    duration::parse(raw).map_err(|e| ConfigError::Env {
        var,
        message: e.to_string(),
    })
}
