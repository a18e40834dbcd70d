//! Health check endpoint handlers.
//!
//! Provides health checks for monitoring and load balancers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sift_persistence::core::SearchBackend;
use tracing::{debug, warn};

use crate::responses::HealthResponse;
use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// Asks the cluster for its health and version. The check itself never
/// fails; an unreachable cluster is reported as unhealthy.
///
/// # HTTP Request
///
/// `GET [base]/health`
///
/// # Response
///
/// - `200 OK` - cluster is green or yellow
/// - `503 Service Unavailable` - cluster is red or unreachable
pub async fn health_handler<B>(State(state): State<AppState<B>>) -> Response
where
    B: SearchBackend + 'static,
{
    debug!("Processing health check request");

    let response = HealthResponse::new(state.indices().health().await);
    let status = if response.is_healthy() {
        StatusCode::OK
    } else {
        warn!(
            cluster_status = %response.checks.elasticsearch.status,
            "Health check failed"
        );
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response)).into_response()
}

/// Handler for the liveness check. Answers as long as the process serves.
///
/// # HTTP Request
///
/// `GET [base]/_liveness`
pub async fn liveness_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// Handler for the readiness check.
///
/// Ready once the cluster is reachable and not red.
///
/// # HTTP Request
///
/// `GET [base]/_readiness`
pub async fn readiness_handler<B>(State(state): State<AppState<B>>) -> Response
where
    B: SearchBackend + 'static,
{
    debug!("Processing readiness check request");

    let report = state.indices().health().await;
    let (status, ready) = if report.is_healthy {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    };

    let response = serde_json::json!({
        "status": ready,
        "backend": state.backend_name(),
        "checks": {
            "elasticsearch": report.status
        }
    });

    (status, Json(response)).into_response()
}
