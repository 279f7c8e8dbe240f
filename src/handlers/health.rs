use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use std::time::Instant;

use crate::{ApiResponse, AppState};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: ComponentStatus,
    pub version: &'static str,
    pub timestamp: String,
    pub database: ComponentStatus,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Liveness plus a database ping. 503 when the database is unreachable.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let started = Instant::now();
    let db_result = crate::db::check_connection(&state.db).await;
    let latency_ms = started.elapsed().as_millis() as u64;

    let (status, code, error) = match db_result {
        Ok(()) => (ComponentStatus::Up, StatusCode::OK, None),
        Err(e) => (
            ComponentStatus::Down,
            StatusCode::SERVICE_UNAVAILABLE,
            Some(e.to_string()),
        ),
    };

    let body = HealthResponse {
        status: status.clone(),
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
        database: status,
        latency_ms,
        error,
    };
    let response = match code {
        StatusCode::OK => ApiResponse::success(body),
        _ => ApiResponse::failure("Database unreachable", body),
    };
    (code, Json(response))
}
