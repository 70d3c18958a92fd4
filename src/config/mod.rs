//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional TOML file (loader.rs)
//!     → environment overrides (env.rs)
//!     → validation.rs (semantic checks)
//!     → ApiConfig (validated, immutable)
//!     → shared by value with each subsystem at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow an empty environment
//! - Validation separates syntactic (serde) from semantic checks

pub mod duration;
pub mod env;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_config_with, ConfigError};
pub use schema::{
    ApiConfig, BackendsConfig, CorsConfig, FaultInjectionConfig, FaultKind, ListenerConfig,
    LogFormat, ObservabilityConfig,
};
