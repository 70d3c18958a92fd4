//! Cross-origin resource sharing.

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::CorsConfig;

/// CORS layer for every route.
///
/// Credentials are allowed, so a wildcard origin is answered by echoing the
/// caller's `Origin` rather than a literal `*`.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origin = if config.allowed_origin == "*" {
        AllowOrigin::mirror_request()
    } else {
        match HeaderValue::from_str(&config.allowed_origin) {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::warn!(origin = %config.allowed_origin, "Invalid CORS origin, denying all");
                AllowOrigin::list(std::iter::empty::<HeaderValue>())
            }
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::HEAD])
}
