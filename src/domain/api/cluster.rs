// Copyright 2025 metalstack.cloud Team.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Cluster entities and requests of the `ClusterService`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Cluster {
    pub uuid: String,
    pub name: String,
    pub project: String,
    pub tenant: String,
    pub partition: String,
    pub kubernetes: KubernetesSpec,
    pub workers: Vec<Worker>,
    pub maintenance: Maintenance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ClusterStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Cluster {
    /// Minimum and maximum node count summed over all worker groups.
    pub fn size_range(&self) -> (u32, u32) {
        self.workers
            .iter()
            .fold((0, 0), |(min, max), w| (min + w.minsize, max + w.maxsize))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct KubernetesSpec {
    pub version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Worker {
    pub name: String,
    pub machine_type: String,
    pub minsize: u32,
    pub maxsize: u32,
    pub maxsurge: u32,
    pub maxunavailable: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Maintenance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kubernetes_autoupdate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machineimage_autoupdate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_window: Option<MaintenanceTimeWindow>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct MaintenanceTimeWindow {
    /// Begin of the window, RFC 3339 time of day as sent by the API
    pub begin: String,
    /// Protojson duration, e.g. `"3600s"`
    pub duration: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ClusterStatus {
    pub uuid: String,
    pub progress: u32,
    pub state: String,
    #[serde(rename = "type")]
    pub operation_type: String,
    pub api_server_ready: String,
    pub control_plane_ready: String,
    pub nodes_ready: String,
    pub system_components_ready: String,
    pub last_errors: Vec<ClusterStatusError>,
}

impl ClusterStatus {
    pub fn is_healthy(&self) -> bool {
        [
            &self.api_server_ready,
            &self.control_plane_ready,
            &self.nodes_ready,
            &self.system_components_ready,
        ]
        .iter()
        .all(|s| s.as_str() == "True")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ClusterStatusError {
    pub description: String,
    pub task_id: String,
    pub codes: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterServiceCreateRequest {
    pub project: String,
    pub name: String,
    pub partition: String,
    pub kubernetes: KubernetesSpec,
    pub workers: Vec<Worker>,
    pub maintenance: Maintenance,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterServiceUpdateRequest {
    pub uuid: String,
    pub project: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kubernetes: Option<KubernetesSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<Vec<WorkerUpdate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance: Option<Maintenance>,
}

/// Worker group update; absent fields keep the current value.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkerUpdate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minsize: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxsize: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxsurge: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxunavailable: Option<u32>,
}

impl From<&Worker> for WorkerUpdate {
    fn from(w: &Worker) -> Self {
        Self {
            name: w.name.clone(),
            machine_type: Some(w.machine_type.clone()),
            minsize: Some(w.minsize),
            maxsize: Some(w.maxsize),
            maxsurge: Some(w.maxsurge),
            maxunavailable: Some(w.maxunavailable),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterResponse {
    pub cluster: Cluster,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterListResponse {
    pub clusters: Vec<Cluster>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterCredentialsResponse {
    pub kubeconfig: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ClusterMonitoring {
    pub grafana: GrafanaAccess,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct GrafanaAccess {
    pub endpoint: String,
    pub username: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_deserialize_sparse_protojson() {
        let json = r#"{
            "uuid": "c-1",
            "name": "prod",
            "partition": "eqx-mu4",
            "kubernetes": {"version": "1.30.4"},
            "workers": [{"name": "group-0", "machineType": "c1-medium-x86", "minsize": 1, "maxsize": 3}],
            "status": {"progress": 100, "state": "Succeeded", "type": "Reconcile", "apiServerReady": "True"},
            "createdAt": "2024-05-01T10:00:00Z"
        }"#;

        let cluster: Cluster = serde_json::from_str(json).unwrap();
        assert_eq!(cluster.uuid, "c-1");
        assert_eq!(cluster.workers[0].maxsurge, 0);
        assert_eq!(cluster.size_range(), (1, 3));
        let status = cluster.status.unwrap();
        assert_eq!(status.operation_type, "Reconcile");
        assert!(!status.is_healthy());
    }

    #[test]
    fn test_update_request_skips_unset_fields() {
        let rq = ClusterServiceUpdateRequest {
            uuid: "c-1".to_string(),
            project: "p-1".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&rq).unwrap();
        assert_eq!(value, serde_json::json!({"uuid": "c-1", "project": "p-1"}));
    }
}
