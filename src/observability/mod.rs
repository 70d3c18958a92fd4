//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handlers, backend clients, fault injection
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (text or JSON)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every request span
//! - Injected faults are logged and counted apart from real backend errors

pub mod logging;
pub mod metrics;
