use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::controller::AppState;

/// Readiness response
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    status: String,
    ticks: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_tick_at: Option<DateTime<Utc>>,
    active_faults: usize,
}

/// GET /healthz - Liveness probe
pub async fn liveness_check() -> impl IntoResponse {
    StatusCode::OK
}

/// GET /health/ready - Readiness probe
///
/// Ready once the simulation loop has published at least one tick.
pub async fn readiness_check(State(st): State<AppState>) -> impl IntoResponse {
    let engine = st.controller.engine();
    let ready = st.controller.is_ready();

    let response = ReadinessResponse {
        status: if ready { "ready" } else { "starting" }.to_string(),
        ticks: engine.sensors().ticks(),
        last_tick_at: engine.sensors().updated_at(),
        active_faults: engine.faults().len(),
    };

    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
