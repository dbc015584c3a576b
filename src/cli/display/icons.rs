//! Status icons for CLI output

use crate::domain::api::{Cluster, ServiceHealth};

/// Status icons for different states
pub struct StatusIcon;

impl StatusIcon {
    pub const SUCCESS: &'static str = "✓";

    pub const WARNING: &'static str = "⚠";

    pub const ERROR: &'static str = "✗";

    /// Operation in progress
    pub const PENDING: &'static str = "⏳";

    pub const UNKNOWN: &'static str = "?";

    /// Icon summarizing a cluster's last operation and readiness.
    pub fn cluster(cluster: &Cluster) -> &'static str {
        let Some(status) = cluster.status.as_ref() else {
            return Self::UNKNOWN;
        };

        match status.state.as_str() {
            "Failed" | "Error" | "Aborted" => Self::ERROR,
            "Processing" | "Pending" => Self::PENDING,
            _ if status.is_healthy() => Self::SUCCESS,
            _ if !status.last_errors.is_empty() => Self::ERROR,
            _ => Self::WARNING,
        }
    }

    pub fn health(service: &ServiceHealth) -> &'static str {
        if service.is_serving() {
            Self::SUCCESS
        } else if service.status.ends_with("UNHEALTHY") {
            Self::ERROR
        } else if service.status.ends_with("DEGRADED") {
            Self::WARNING
        } else {
            Self::UNKNOWN
        }
    }

    pub fn flag(value: bool) -> &'static str {
        if value {
            Self::SUCCESS
        } else {
            ""
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api::ClusterStatus;

    fn ready(state: &str) -> ClusterStatus {
        ClusterStatus {
            state: state.to_string(),
            api_server_ready: "True".to_string(),
            control_plane_ready: "True".to_string(),
            nodes_ready: "True".to_string(),
            system_components_ready: "True".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_cluster_icon() {
        let mut cluster = Cluster::default();
        assert_eq!(StatusIcon::cluster(&cluster), StatusIcon::UNKNOWN);

        cluster.status = Some(ready("Succeeded"));
        assert_eq!(StatusIcon::cluster(&cluster), StatusIcon::SUCCESS);

        cluster.status = Some(ready("Processing"));
        assert_eq!(StatusIcon::cluster(&cluster), StatusIcon::PENDING);

        cluster.status = Some(ClusterStatus {
            state: "Succeeded".to_string(),
            ..Default::default()
        });
        assert_eq!(StatusIcon::cluster(&cluster), StatusIcon::WARNING);
    }

    #[test]
    fn test_health_icon() {
        let healthy = ServiceHealth {
            status: "SERVICE_STATUS_HEALTHY".to_string(),
            ..Default::default()
        };
        let broken = ServiceHealth {
            status: "SERVICE_STATUS_UNHEALTHY".to_string(),
            ..Default::default()
        };
        assert_eq!(StatusIcon::health(&healthy), StatusIcon::SUCCESS);
        assert_eq!(StatusIcon::health(&broken), StatusIcon::ERROR);
    }
}
