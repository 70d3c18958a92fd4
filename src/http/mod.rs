//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack, route table)
//!     → request.rs (request id assigned and propagated)
//!     → [fault injection on the cache route]
//!     → handlers (validation.rs for submissions)
//!     → response.rs (HandlerResult → status, headers, body)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod validation;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use response::HandlerResult;
pub use server::{AppState, HttpServer};
pub use validation::{InvalidUrl, SubmittedUrl};
