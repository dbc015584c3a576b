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

//! Entities and requests of the metalstack.cloud API, in protojson form

pub mod cluster;
pub mod ip;
pub mod payment;
pub mod storage;
pub mod system;
pub mod tenant;
pub mod token;

pub use self::cluster::{
    Cluster, ClusterMonitoring, ClusterServiceCreateRequest, ClusterServiceUpdateRequest,
    ClusterStatus, KubernetesSpec, Maintenance, MaintenanceTimeWindow, Worker, WorkerUpdate,
};
pub use self::ip::{Ip, IpServiceAllocateRequest, IpServiceUpdateRequest, IpType};
pub use self::payment::Coupon;
pub use self::storage::{Snapshot, StorageListRequest, Volume};
pub use self::system::{ClientServerVersion, Health, ServiceHealth, TokenScopedMethods, Version};
pub use self::tenant::{
    Project, ProjectServiceCreateRequest, ProjectServiceListRequest, ProjectServiceUpdateRequest,
    Tenant, TenantServiceCreateRequest, TenantServiceListRequest, TenantServiceUpdateRequest,
};
pub use self::token::{
    MethodPermission, Token, TokenCreateResponse, TokenServiceCreateRequest,
    TokenServiceUpdateRequest,
};
