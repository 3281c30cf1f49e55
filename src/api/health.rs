//! Liveness, readiness and static health endpoints

use std::time::Instant;

use axum::{extract::State, http::StatusCode};
use serde::Serialize;

use super::state::AppState;
use crate::api::types::Json;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    fn status_code(self) -> StatusCode {
        match self {
            Self::Healthy => StatusCode::OK,
            Self::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<ComponentCheck>,
}

/// Result of probing one dependency
#[derive(Debug, Serialize)]
pub struct ComponentCheck {
    pub name: &'static str,
    pub status: HealthStatus,
    /// Error kind when unhealthy; details stay in the logs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    pub latency_ms: u64,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        version: VERSION,
        checks: Vec::new(),
    })
}

/// GET /ready, 503 while the credential store cannot be queried
pub async fn ready_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let store = probe_credential_store(&state).await;
    let status = store.status;

    (
        status.status_code(),
        Json(HealthResponse {
            status,
            version: VERSION,
            checks: vec![store],
        }),
    )
}

/// GET /live
pub async fn live_check() -> StatusCode {
    StatusCode::OK
}

async fn probe_credential_store(state: &AppState) -> ComponentCheck {
    let start = Instant::now();
    let result = state.user_service.count_active().await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(_) => ComponentCheck {
            name: "credential_store",
            status: HealthStatus::Healthy,
            error: None,
            latency_ms,
        },
        Err(e) => {
            tracing::warn!(error = %e, latency_ms, "Readiness probe failed");
            ComponentCheck {
                name: "credential_store",
                status: HealthStatus::Unhealthy,
                error: Some(e.kind()),
                latency_ms,
            }
        }
    }
}
