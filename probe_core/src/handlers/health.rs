//! Network health and liveness handlers

use crate::{probe::HealthVerdict, AppState};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::info;

/// Probes the configured default host. Always `200 OK`; the verdict carries the outcome.
pub async fn handle_network_health(State(state): State<AppState>) -> Json<HealthVerdict> {
    let host = &state.probe_defaults.default_host;
    let packet_count = state.probe_defaults.packet_count;

    info!("GET /network-health - probing {} with {} packets", host, packet_count);

    Json(state.probe.evaluate(host, packet_count).await)
}

pub async fn handle_liveness(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /health - Liveness probe");

    (StatusCode::OK, Json(serde_json::json!({
        "status": "alive",
        "timestamp": chrono::Utc::now().timestamp(),
        "version": state.version,
    })))
}
