//! Route table

use super::health::{handle_liveness, handle_network_health};
use crate::{error::AppError, AppState};
use axum::{
    extract::State,
    http::Uri,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_liveness))
        .route("/network-health", get(handle_network_health))
        .fallback(handle_not_found)
}

async fn handle_root(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "app": state.app_name,
        "version": state.version,
        "platform": state.probe.platform(),
        "endpoints": {
            "liveness": "/health",
            "network_health": "/network-health"
        }
    }))
}

async fn handle_not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
