//! Health and index status bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sift_persistence::types::HealthReport;

/// Name reported in the `service` field of health responses.
pub const SERVICE_NAME: &str = "sift";

/// Per-dependency health checks.
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    /// The search cluster.
    pub elasticsearch: HealthReport,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// `healthy` or `unhealthy`.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Service version.
    pub version: &'static str,
    /// When the check ran.
    pub timestamp: DateTime<Utc>,
    /// Dependency checks.
    pub checks: HealthChecks,
}

impl HealthResponse {
    /// Builds the response from a cluster health report.
    pub fn new(report: HealthReport) -> Self {
        Self {
            status: if report.is_healthy {
                "healthy"
            } else {
                "unhealthy"
            },
            service: SERVICE_NAME,
            version: crate::VERSION,
            timestamp: Utc::now(),
            checks: HealthChecks {
                elasticsearch: report,
            },
        }
    }

    /// True when every check passed.
    pub fn is_healthy(&self) -> bool {
        self.checks.elasticsearch.is_healthy
    }
}

/// Body of `GET /indices/{index}`.
#[derive(Debug, Clone, Serialize)]
pub struct IndexStatusResponse {
    /// Index name.
    pub index: String,
    /// Whether it exists.
    pub exists: bool,
}
