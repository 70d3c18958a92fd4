//! Fault injection for chaos testing.
//!
//! # Behavior
//! ```text
//! rate == 0            → pass through, no random draw
//! draw <  rate, delay  → sleep error_delay, then pass through
//! draw <  rate, error  → answer error_code, inner handler never runs
//! draw >= rate         → pass through
//! ```
//!
//! # Design Decisions
//! - Configuration is immutable; the RNG is the only mutable state
//! - The RNG is injectable so tests can seed it
//! - The lock is released before any `.await`
//! - Injected faults are logged with `injected = true` and counted separately

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{FaultInjectionConfig, FaultKind};
use crate::http::request::request_id;
use crate::observability::metrics;

/// A fault chosen for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Delay(Duration),
    Error(StatusCode),
}

/// Decides, per request, whether to inject a fault.
pub struct FaultInjector {
    config: FaultInjectionConfig,
    status: StatusCode,
    rng: Mutex<StdRng>,
}

impl FaultInjector {
    /// Injector drawing from an entropy-seeded RNG.
    pub fn new(config: FaultInjectionConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_rng(config: FaultInjectionConfig, rng: StdRng) -> Self {
        let status =
            StatusCode::from_u16(config.error_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self {
            config,
            status,
            rng: Mutex::new(rng),
        }
    }

    /// Injector with a fixed seed, for reproducible runs.
    pub fn seeded(config: FaultInjectionConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_enabled()
    }

    pub fn config(&self) -> &FaultInjectionConfig {
        &self.config
    }

    /// Draw for one request.
    pub fn decide(&self) -> Option<Fault> {
        if !self.is_enabled() {
            return None;
        }

        let draw: f64 = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .gen();
        if draw >= self.config.rate {
            return None;
        }

        Some(match self.config.error_type {
            FaultKind::Delay => Fault::Delay(self.config.error_delay),
            FaultKind::HttpError => Fault::Error(self.status),
        })
    }
}

/// Middleware applying [`FaultInjector`] decisions.
pub async fn fault_injection_middleware(
    State(injector): State<Arc<FaultInjector>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match injector.decide() {
        None => next.run(request).await,
        Some(Fault::Delay(delay)) => {
            tracing::warn!(
                injected = true,
                kind = "delay",
                delay_ms = delay.as_millis() as u64,
                path = %request.uri().path(),
                request_id = %request_id(&request),
                "Injecting delay"
            );
            metrics::record_injected_fault(FaultKind::Delay.as_str());
            tokio::time::sleep(delay).await;
            next.run(request).await
        }
        Some(Fault::Error(status)) => {
            tracing::warn!(
                injected = true,
                kind = "http_error",
                status = status.as_u16(),
                path = %request.uri().path(),
                request_id = %request_id(&request),
                "Injecting error response"
            );
            metrics::record_injected_fault(FaultKind::HttpError.as_str());
            (
                status,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                "Injected failure\n",
            )
                .into_response()
        }
    }
}
