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

//! Health, version and method discovery

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::token::MethodPermission;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceHealth {
    pub name: String,
    pub status: String,
    pub message: String,
}

impl ServiceHealth {
    pub fn is_serving(&self) -> bool {
        self.status == "SERVICE_STATUS_HEALTHY"
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Health {
    pub services: Vec<ServiceHealth>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthResponse {
    pub health: Health,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Version {
    pub version: String,
    pub revision: String,
    pub git_sha1: String,
    pub build_date: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionResponse {
    pub version: Version,
}

/// Client and server versions side by side
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientServerVersion {
    pub client: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<Version>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenScopedMethods {
    pub permissions: Vec<MethodPermission>,
    pub project_roles: BTreeMap<String, String>,
    pub tenant_roles: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_role: Option<String>,
}
