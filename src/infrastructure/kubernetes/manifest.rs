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

//! PersistentVolume / PersistentVolumeClaim manifests for existing volumes

use crate::domain::api::Volume;
use crate::infrastructure::constants::{
    CSI_DRIVER_LIGHTBITS, DEFAULT_ACCESS_MODE, DEFAULT_FS_TYPE, VOLUME_HANDLE_SCHEME,
};
use crate::shared::error::{CliError, Result};
use k8s_openapi::api::core::v1::{
    CSIPersistentVolumeSource, ObjectReference, PersistentVolume, PersistentVolumeClaim,
    PersistentVolumeClaimSpec, PersistentVolumeSpec, VolumeResourceRequirements,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

pub struct ManifestBuilder<'a> {
    volume: &'a Volume,
    name: String,
    namespace: String,
}

impl<'a> ManifestBuilder<'a> {
    pub fn new(volume: &'a Volume, name: Option<String>, namespace: String) -> Self {
        let name = name.unwrap_or_else(|| {
            if volume.name.is_empty() {
                volume.uuid.clone()
            } else {
                volume.name.clone()
            }
        });
        Self {
            volume,
            name,
            namespace,
        }
    }

    /// CSI volume handle understood by the lightbits driver.
    pub fn volume_handle(&self) -> Result<String> {
        if self.volume.node_ips.is_empty() || self.volume.volume_handle.is_empty() {
            return Err(CliError::invalid_argument(format!(
                "volume {} has no node ips or volume handle yet",
                self.volume.uuid
            )));
        }
        Ok(format!(
            "mgmt:{}|nguid:{}|proj:{}|scheme:{}",
            self.volume.node_ips.join(","),
            self.volume.volume_handle,
            self.volume.project,
            VOLUME_HANDLE_SCHEME
        ))
    }

    fn capacity(&self) -> BTreeMap<String, Quantity> {
        BTreeMap::from([(
            "storage".to_string(),
            Quantity(self.volume.size.to_string()),
        )])
    }

    pub fn persistent_volume(&self) -> Result<PersistentVolume> {
        Ok(PersistentVolume {
            metadata: ObjectMeta {
                name: Some(self.name.clone()),
                ..Default::default()
            },
            spec: Some(PersistentVolumeSpec {
                access_modes: Some(vec![DEFAULT_ACCESS_MODE.to_string()]),
                capacity: Some(self.capacity()),
                claim_ref: Some(ObjectReference {
                    name: Some(self.name.clone()),
                    namespace: Some(self.namespace.clone()),
                    ..Default::default()
                }),
                csi: Some(CSIPersistentVolumeSource {
                    driver: CSI_DRIVER_LIGHTBITS.to_string(),
                    fs_type: Some(DEFAULT_FS_TYPE.to_string()),
                    volume_handle: self.volume_handle()?,
                    ..Default::default()
                }),
                persistent_volume_reclaim_policy: Some("Retain".to_string()),
                storage_class_name: Some(self.volume.storage_class.clone()),
                volume_mode: Some("Filesystem".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    pub fn persistent_volume_claim(&self) -> PersistentVolumeClaim {
        PersistentVolumeClaim {
            metadata: ObjectMeta {
                name: Some(self.name.clone()),
                namespace: Some(self.namespace.clone()),
                ..Default::default()
            },
            spec: Some(PersistentVolumeClaimSpec {
                access_modes: Some(vec![DEFAULT_ACCESS_MODE.to_string()]),
                resources: Some(VolumeResourceRequirements {
                    requests: Some(self.capacity()),
                    ..Default::default()
                }),
                storage_class_name: Some(self.volume.storage_class.clone()),
                volume_name: Some(self.name.clone()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// Both manifests as a multi-document YAML stream.
    pub fn render(&self) -> Result<String> {
        let pv = serde_yaml::to_string(&self.persistent_volume()?)?;
        let pvc = serde_yaml::to_string(&self.persistent_volume_claim())?;
        Ok(format!("---\n{}---\n{}", pv, pvc))
    }
}
