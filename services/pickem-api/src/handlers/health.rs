//! Health check handlers

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub checks: ReadyChecks,
}

#[derive(Debug, Serialize)]
pub struct ReadyChecks {
    pub cookie: &'static str,
    pub max_age_secs: u64,
}

/// GET /health - Liveness probe (fast, no dependencies)
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "pickem-api",
    })
}

/// GET /ready - Readiness probe (gateway is built before the listener opens)
pub async fn ready(State(state): State<AppState>) -> Json<ReadyResponse> {
    Json(ReadyResponse {
        status: "ready",
        service: "pickem-api",
        checks: ReadyChecks {
            cookie: if state.gateway.cookie_config().secure {
                "secure"
            } else {
                "insecure"
            },
            max_age_secs: state.config.codec.max_age.as_secs(),
        },
    })
}
