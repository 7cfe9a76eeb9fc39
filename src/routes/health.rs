//! Service banner, liveness and readiness endpoints.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

pub const SERVICE_NAME: &str = "QuickTask Analytics API";

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Liveness {
    pub status: &'static str,
}

/// Readiness probe detail.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: String,
    pub database_name: String,
}

/// GET / — service banner.
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
    })
}

/// GET /health — always OK while the process is running.
pub async fn live() -> Json<Liveness> {
    Json(Liveness { status: "ok" })
}

/// GET /health/ready — pings the task store.
pub async fn ready(State(state): State<AppState>) -> Json<HealthStatus> {
    let database = match state.store.ping().await {
        Ok(()) => "connected".to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            "error".to_string()
        }
    };

    Json(HealthStatus {
        status: "ok",
        database,
        database_name: state.config.database_name.clone(),
    })
}
