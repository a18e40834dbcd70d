//! Cluster health summary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Health of the backend cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    /// True when the cluster status is green or yellow.
    pub is_healthy: bool,
    /// Cluster status (`green`, `yellow`, `red`, or `unavailable`).
    pub status: String,
    /// Cluster name.
    pub cluster_name: String,
    /// Engine version.
    pub version: String,
    /// Lucene version.
    pub lucene_version: String,
}

impl HealthReport {
    /// Builds a report from cluster health and cluster info responses.
    pub fn from_cluster(health: &Value, info: &Value) -> Self {
        let status = health
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();

        let cluster_name = health
            .get("cluster_name")
            .or_else(|| info.get("cluster_name"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let version = info.get("version");
        let field = |name: &str| {
            version
                .and_then(|v| v.get(name))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Self {
            is_healthy: matches!(status.as_str(), "green" | "yellow"),
            status,
            cluster_name,
            version: field("number"),
            lucene_version: field("lucene_version"),
        }
    }

    /// A report for a cluster that could not be reached.
    pub fn unavailable() -> Self {
        Self {
            is_healthy: false,
            status: "unavailable".to_string(),
            cluster_name: String::new(),
            version: String::new(),
            lucene_version: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_yellow_is_healthy() {
        let report = HealthReport::from_cluster(
            &json!({"cluster_name": "docker-cluster", "status": "yellow"}),
            &json!({"version": {"number": "8.15.0", "lucene_version": "9.11.1"}}),
        );
        assert!(report.is_healthy);
        assert_eq!(report.cluster_name, "docker-cluster");
        assert_eq!(report.version, "8.15.0");
        assert_eq!(report.lucene_version, "9.11.1");
    }

    #[test]
    fn test_red_is_unhealthy() {
        let report = HealthReport::from_cluster(&json!({"status": "red"}), &json!({}));
        assert!(!report.is_healthy);
        assert_eq!(report.status, "red");
    }
}
