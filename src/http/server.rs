//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers under the mount path
//! - Wire up middleware (request ID, tracing, CORS, timeout, body limit)
//! - Attach fault injection to the cache route when enabled
//! - Bind server to listener and drain on shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{Request, StatusCode},
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::backend::{CacheService, EmojifyService};
use crate::config::ApiConfig;
use crate::handlers::{cache_handler, fetch_handler, health_handler, submit_handler};
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::resilience::fault_injection::{fault_injection_middleware, FaultInjector};
use crate::security::cors::cors_layer;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub emojify: Arc<dyn EmojifyService>,
    pub cache: Arc<dyn CacheService>,
    pub health_timeout: Duration,
}

/// HTTP server for the emojify API.
pub struct HttpServer {
    router: Router,
    config: ApiConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ApiConfig, state: AppState) -> Self {
        let injector = Arc::new(FaultInjector::new(config.fault_injection.clone()));
        Self::with_injector(config, state, injector)
    }

    /// Create a server with a caller-supplied fault injector.
    pub fn with_injector(config: ApiConfig, state: AppState, injector: Arc<FaultInjector>) -> Self {
        let router = Self::build_router(&config, state, injector);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ApiConfig, state: AppState, injector: Arc<FaultInjector>) -> Router {
        let prefix = config.listener.route_prefix();

        let mut cache_routes =
            Router::new().route(&format!("{}/cache/{{file}}", prefix), get(cache_handler));
        if injector.is_enabled() {
            let faults = injector.config();
            tracing::info!(
                rate = faults.rate,
                error_type = %faults.error_type,
                code = faults.error_code,
                delay = ?faults.error_delay,
                "Injecting errors into cache handler"
            );
            cache_routes = cache_routes.route_layer(middleware::from_fn_with_state(
                injector,
                fault_injection_middleware,
            ));
        }

        Router::new()
            .route(&format!("{}/health", prefix), get(health_handler))
            .route(&format!("{}/", prefix), post(submit_handler))
            .route(&format!("{}/{{id}}", prefix), get(fetch_handler))
            .merge(cache_routes)
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.listener.max_body_size))
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            path = %request.uri().path(),
                            request_id = %request_id(request),
                        )
                    }))
                    .layer(propagate_request_id_layer())
                    .layer(cors_layer(&config.cors))
                    .layer(TimeoutLayer::with_status_code(
                        StatusCode::REQUEST_TIMEOUT,
                        config.listener.request_timeout,
                    )),
            )
    }

    /// The fully layered router, for driving the service in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on `listener` until `shutdown` fires, then drain.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mount_path = %self.config.listener.mount_path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}
