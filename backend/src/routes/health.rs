//! Health check endpoints
//!
//! - `/health` static OK with the build version
//! - `/health/live` liveness, never touches dependencies
//! - `/health/ready` readiness, 503 while the database is unreachable

use crate::{db, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::time::Instant;

const DATABASE_UNAVAILABLE: &str = "Database unavailable";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseCheck>,
}

/// Result of probing the database
#[derive(Debug, Serialize)]
pub struct DatabaseCheck {
    pub healthy: bool,
    pub latency_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthResponse {
    fn new(status: &'static str) -> Self {
        Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
            database: None,
        }
    }
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::new("healthy"))
}

pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse::new("alive"))
}

pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let started = Instant::now();
    let result = db::health_check(state.db()).await;
    let latency_ms = started.elapsed().as_millis();

    let (status_code, status, check) = match result {
        Ok(()) => (
            StatusCode::OK,
            "ready",
            DatabaseCheck {
                healthy: true,
                latency_ms,
                message: None,
            },
        ),
        // The cause is logged by db::health_check and kept out of the body
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "not_ready",
            DatabaseCheck {
                healthy: false,
                latency_ms,
                message: Some(DATABASE_UNAVAILABLE.to_string()),
            },
        ),
    };

    let mut response = HealthResponse::new(status);
    response.database = Some(check);
    (status_code, Json(response))
}
