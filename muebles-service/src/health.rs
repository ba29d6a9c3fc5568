//! Health check handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service name
    pub service: String,

    /// Version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Readiness check response with dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,

    /// Service name
    pub service: String,

    /// Dependency statuses
    pub dependencies: HashMap<String, DependencyStatus>,
}

/// Individual dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct DependencyStatus {
    /// Dependency is healthy
    pub healthy: bool,

    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Simple health check (liveness probe)
///
/// Always returns 200 OK if the service is running.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: state.config().service.name.clone(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check (readiness probe)
///
/// Returns 200 OK when the document store answers a ping, 503 Service
/// Unavailable otherwise.
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let mut dependencies = HashMap::new();

    let store = state.store();
    let store_status = match store.ping().await {
        Ok(()) => DependencyStatus {
            healthy: true,
            message: Some(format!("Connected ({})", store.backend())),
        },
        Err(e) => {
            tracing::error!(
                operation = %e.operation,
                kind = %e.kind,
                "Store health check failed: {}", e.message
            );
            DependencyStatus {
                healthy: false,
                message: Some("Store unreachable".to_string()),
            }
        }
    };
    let ready = store_status.healthy;
    dependencies.insert("store".to_string(), store_status);

    let response = ReadinessResponse {
        ready,
        service: state.config().service.name.clone(),
        dependencies,
    };

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
