//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → cors.rs (preflight answers, allowed origin, credentials)
//!     → body limit (server.rs, 413 on oversized submissions)
//!     → handlers
//! ```
//!
//! Authentication is not performed by this service.

pub mod cors;
