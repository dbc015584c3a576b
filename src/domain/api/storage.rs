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

//! Volumes and snapshots of the `VolumeService` and `SnapshotService`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use std::collections::BTreeMap;

#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Volume {
    pub uuid: String,
    pub name: String,
    pub project: String,
    pub partition: String,
    pub storage_class: String,
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub size: u64,
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub usage: u64,
    pub state: String,
    pub attached_to: Vec<String>,
    pub source_snapshot_uuid: String,
    pub source_snapshot_name: String,
    pub volume_handle: String,
    pub node_ips: Vec<String>,
    pub rebuild_progress: String,
    pub primary_node_uuid: String,
    pub qos_policy_uuid: String,
    pub qos_policy_name: String,
    pub replica_count: u32,
    pub protection_state: String,
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub logical_used_storage: u64,
    pub cluster_name: String,
    pub labels: BTreeMap<String, String>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Snapshot {
    pub uuid: String,
    pub name: String,
    pub project: String,
    pub partition: String,
    pub storage_class: String,
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub size: u64,
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub usage: u64,
    pub state: String,
    pub source_volume_uuid: String,
    pub source_volume_name: String,
    pub primary_node_uuid: String,
    /// Protojson duration
    pub retention: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StorageListRequest {
    pub project: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeResponse {
    pub volume: Volume,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeListResponse {
    pub volumes: Vec<Volume>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotResponse {
    pub snapshot: Snapshot,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotListResponse {
    pub snapshots: Vec<Snapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_sizes_accept_strings_and_numbers() {
        let v: Volume =
            serde_json::from_str(r#"{"uuid":"v-1","size":"10737418240","usage":1024}"#).unwrap();
        assert_eq!(v.size, 10_737_418_240);
        assert_eq!(v.usage, 1024);
        assert_eq!(v.logical_used_storage, 0);
    }

    #[test]
    fn test_volume_size_serializes_as_string() {
        let v = Volume {
            uuid: "v-1".to_string(),
            size: 42,
            ..Default::default()
        };
        let value = serde_json::to_value(&v).unwrap();
        assert_eq!(value["size"], serde_json::json!("42"));
    }
}
