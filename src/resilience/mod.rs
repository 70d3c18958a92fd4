//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request (cache route by default):
//!     → fault_injection.rs (maybe delay, maybe answer with a synthetic error)
//!     → handler
//!         → timeouts.rs (deadline on composite backend waits)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No retries: failures are reported, recovery belongs to the backends
//! - Fault injection is a plain axum middleware and can wrap any route

pub mod fault_injection;
pub mod timeouts;
