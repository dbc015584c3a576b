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

use super::transport::{HttpTransport, Transport};
use crate::domain::api::cluster::{
    ClusterCredentialsResponse, ClusterListResponse, ClusterResponse,
};
use crate::domain::api::ip::{IpListResponse, IpResponse};
use crate::domain::api::payment::CouponListResponse;
use crate::domain::api::storage::{
    SnapshotListResponse, SnapshotResponse, VolumeListResponse, VolumeResponse,
};
use crate::domain::api::system::{HealthResponse, VersionResponse};
use crate::domain::api::tenant::{
    ProjectListResponse, ProjectResponse, TenantListResponse, TenantResponse,
};
use crate::domain::api::token::{TokenListResponse, TokenResponse};
use crate::domain::api::*;
use crate::domain::config::Settings;
use crate::infrastructure::constants::*;
use crate::shared::duration::to_proto_duration;
use crate::shared::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// Typed access to the metalstack.cloud API services.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let transport = HttpTransport::new(
            &settings.api_url,
            settings.api_token.clone(),
            settings.timeout,
        )?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn call<Req, Resp>(&self, service: &str, method: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let procedure = format!("{}.{}/{}", API_PACKAGE, service, method);
        let payload = serde_json::to_value(request)?;
        let response = self.transport.unary(&procedure, payload).await?;
        Ok(serde_json::from_value(response)?)
    }

    // ============================================================================
    // Clusters
    // ============================================================================

    pub async fn cluster_list(&self, project: &str) -> Result<Vec<Cluster>> {
        let rs: ClusterListResponse = self
            .call(SERVICE_CLUSTER, "List", &json!({ "project": project }))
            .await?;
        Ok(rs.clusters)
    }

    pub async fn cluster_get(&self, project: &str, uuid: &str) -> Result<Cluster> {
        let rs: ClusterResponse = self
            .call(SERVICE_CLUSTER, "Get", &json!({ "project": project, "uuid": uuid }))
            .await?;
        Ok(rs.cluster)
    }

    pub async fn cluster_create(&self, rq: &ClusterServiceCreateRequest) -> Result<Cluster> {
        let rs: ClusterResponse = self.call(SERVICE_CLUSTER, "Create", rq).await?;
        Ok(rs.cluster)
    }

    pub async fn cluster_update(&self, rq: &ClusterServiceUpdateRequest) -> Result<Cluster> {
        let rs: ClusterResponse = self.call(SERVICE_CLUSTER, "Update", rq).await?;
        Ok(rs.cluster)
    }

    pub async fn cluster_delete(&self, project: &str, uuid: &str) -> Result<Cluster> {
        let rs: ClusterResponse = self
            .call(SERVICE_CLUSTER, "Delete", &json!({ "project": project, "uuid": uuid }))
            .await?;
        Ok(rs.cluster)
    }

    pub async fn cluster_credentials(
        &self,
        project: &str,
        uuid: &str,
        expiration: Duration,
    ) -> Result<String> {
        let rs: ClusterCredentialsResponse = self
            .call(
                SERVICE_CLUSTER,
                "GetCredentials",
                &json!({
                    "project": project,
                    "uuid": uuid,
                    "expiration": to_proto_duration(expiration),
                }),
            )
            .await?;
        Ok(rs.kubeconfig)
    }

    pub async fn cluster_reconcile(&self, project: &str, uuid: &str) -> Result<Cluster> {
        let rs: ClusterResponse = self
            .call(
                SERVICE_CLUSTER,
                "Operate",
                &json!({ "project": project, "uuid": uuid, "operate": "OPERATE_RECONCILE" }),
            )
            .await?;
        Ok(rs.cluster)
    }

    pub async fn cluster_monitoring(&self, project: &str, uuid: &str) -> Result<ClusterMonitoring> {
        self.call(
            SERVICE_CLUSTER,
            "Monitoring",
            &json!({ "project": project, "uuid": uuid }),
        )
        .await
    }

    // ============================================================================
    // Storage
    // ============================================================================

    pub async fn volume_list(&self, rq: &StorageListRequest) -> Result<Vec<Volume>> {
        let rs: VolumeListResponse = self.call(SERVICE_VOLUME, "List", rq).await?;
        Ok(rs.volumes)
    }

    pub async fn volume_get(&self, project: &str, uuid: &str) -> Result<Volume> {
        let rs: VolumeResponse = self
            .call(SERVICE_VOLUME, "Get", &json!({ "project": project, "uuid": uuid }))
            .await?;
        Ok(rs.volume)
    }

    pub async fn volume_delete(&self, project: &str, uuid: &str) -> Result<Volume> {
        let rs: VolumeResponse = self
            .call(SERVICE_VOLUME, "Delete", &json!({ "project": project, "uuid": uuid }))
            .await?;
        Ok(rs.volume)
    }

    pub async fn snapshot_list(&self, rq: &StorageListRequest) -> Result<Vec<Snapshot>> {
        let rs: SnapshotListResponse = self.call(SERVICE_SNAPSHOT, "List", rq).await?;
        Ok(rs.snapshots)
    }

    pub async fn snapshot_get(&self, project: &str, uuid: &str) -> Result<Snapshot> {
        let rs: SnapshotResponse = self
            .call(SERVICE_SNAPSHOT, "Get", &json!({ "project": project, "uuid": uuid }))
            .await?;
        Ok(rs.snapshot)
    }

    pub async fn snapshot_delete(&self, project: &str, uuid: &str) -> Result<Snapshot> {
        let rs: SnapshotResponse = self
            .call(SERVICE_SNAPSHOT, "Delete", &json!({ "project": project, "uuid": uuid }))
            .await?;
        Ok(rs.snapshot)
    }

    // ============================================================================
    // IPs
    // ============================================================================

    pub async fn ip_list(&self, project: &str) -> Result<Vec<Ip>> {
        let rs: IpListResponse = self
            .call(SERVICE_IP, "List", &json!({ "project": project }))
            .await?;
        Ok(rs.ips)
    }

    pub async fn ip_get(&self, project: &str, uuid: &str) -> Result<Ip> {
        let rs: IpResponse = self
            .call(SERVICE_IP, "Get", &json!({ "project": project, "uuid": uuid }))
            .await?;
        Ok(rs.ip)
    }

    pub async fn ip_allocate(&self, rq: &IpServiceAllocateRequest) -> Result<Ip> {
        let rs: IpResponse = self.call(SERVICE_IP, "Allocate", rq).await?;
        Ok(rs.ip)
    }

    pub async fn ip_update(&self, rq: &IpServiceUpdateRequest) -> Result<Ip> {
        let rs: IpResponse = self.call(SERVICE_IP, "Update", rq).await?;
        Ok(rs.ip)
    }

    pub async fn ip_delete(&self, project: &str, uuid: &str) -> Result<Ip> {
        let rs: IpResponse = self
            .call(SERVICE_IP, "Delete", &json!({ "project": project, "uuid": uuid }))
            .await?;
        Ok(rs.ip)
    }

    // ============================================================================
    // Tenants and projects
    // ============================================================================

    pub async fn tenant_list(&self, rq: &TenantServiceListRequest) -> Result<Vec<Tenant>> {
        let rs: TenantListResponse = self.call(SERVICE_TENANT, "List", rq).await?;
        Ok(rs.tenants)
    }

    pub async fn tenant_get(&self, login: &str) -> Result<Tenant> {
        let rs: TenantResponse = self
            .call(SERVICE_TENANT, "Get", &json!({ "login": login }))
            .await?;
        Ok(rs.tenant)
    }

    pub async fn tenant_create(&self, rq: &TenantServiceCreateRequest) -> Result<Tenant> {
        let rs: TenantResponse = self.call(SERVICE_TENANT, "Create", rq).await?;
        Ok(rs.tenant)
    }

    pub async fn tenant_update(&self, rq: &TenantServiceUpdateRequest) -> Result<Tenant> {
        let rs: TenantResponse = self.call(SERVICE_TENANT, "Update", rq).await?;
        Ok(rs.tenant)
    }

    pub async fn tenant_delete(&self, login: &str) -> Result<Tenant> {
        let rs: TenantResponse = self
            .call(SERVICE_TENANT, "Delete", &json!({ "login": login }))
            .await?;
        Ok(rs.tenant)
    }

    pub async fn project_list(&self, rq: &ProjectServiceListRequest) -> Result<Vec<Project>> {
        let rs: ProjectListResponse = self.call(SERVICE_PROJECT, "List", rq).await?;
        Ok(rs.projects)
    }

    pub async fn project_get(&self, project: &str) -> Result<Project> {
        let rs: ProjectResponse = self
            .call(SERVICE_PROJECT, "Get", &json!({ "project": project }))
            .await?;
        Ok(rs.project)
    }

    pub async fn project_create(&self, rq: &ProjectServiceCreateRequest) -> Result<Project> {
        let rs: ProjectResponse = self.call(SERVICE_PROJECT, "Create", rq).await?;
        Ok(rs.project)
    }

    pub async fn project_update(&self, rq: &ProjectServiceUpdateRequest) -> Result<Project> {
        let rs: ProjectResponse = self.call(SERVICE_PROJECT, "Update", rq).await?;
        Ok(rs.project)
    }

    pub async fn project_delete(&self, project: &str) -> Result<Project> {
        let rs: ProjectResponse = self
            .call(SERVICE_PROJECT, "Delete", &json!({ "project": project }))
            .await?;
        Ok(rs.project)
    }

    // ============================================================================
    // Tokens
    // ============================================================================

    pub async fn token_list(&self) -> Result<Vec<Token>> {
        let rs: TokenListResponse = self.call(SERVICE_TOKEN, "List", &json!({})).await?;
        Ok(rs.tokens)
    }

    pub async fn token_get(&self, uuid: &str) -> Result<Token> {
        let rs: TokenResponse = self
            .call(SERVICE_TOKEN, "Get", &json!({ "uuid": uuid }))
            .await?;
        Ok(rs.token)
    }

    pub async fn token_create(&self, rq: &TokenServiceCreateRequest) -> Result<TokenCreateResponse> {
        self.call(SERVICE_TOKEN, "Create", rq).await
    }

    pub async fn token_update(&self, rq: &TokenServiceUpdateRequest) -> Result<Token> {
        let rs: TokenResponse = self.call(SERVICE_TOKEN, "Update", rq).await?;
        Ok(rs.token)
    }

    pub async fn token_revoke(&self, uuid: &str) -> Result<()> {
        let _: serde_json::Value = self
            .call(SERVICE_TOKEN, "Revoke", &json!({ "uuid": uuid }))
            .await?;
        Ok(())
    }

    // ============================================================================
    // Payment, health, version, methods
    // ============================================================================

    pub async fn coupon_list(&self) -> Result<Vec<Coupon>> {
        let rs: CouponListResponse = self.call(SERVICE_PAYMENT, "ListCoupons", &json!({})).await?;
        Ok(rs.coupons)
    }

    pub async fn health(&self) -> Result<Health> {
        let rs: HealthResponse = self.call(SERVICE_HEALTH, "Get", &json!({})).await?;
        Ok(rs.health)
    }

    pub async fn version(&self) -> Result<Version> {
        let rs: VersionResponse = self.call(SERVICE_VERSION, "Get", &json!({})).await?;
        Ok(rs.version)
    }

    pub async fn token_scoped_methods(&self) -> Result<TokenScopedMethods> {
        self.call(SERVICE_METHOD, "TokenScopedList", &json!({})).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(String, Value)>>,
        response: Value,
    }

    #[async_trait::async_trait]
    impl Transport for Recorder {
        async fn unary(&self, procedure: &str, request: Value) -> Result<Value> {
            self.calls
                .lock()
                .unwrap()
                .push((procedure.to_string(), request));
            Ok(self.response.clone())
        }
    }

    #[tokio::test]
    async fn test_procedure_naming_and_payload() {
        let recorder = Arc::new(Recorder {
            response: json!({"clusters": [{"uuid": "c-1", "name": "prod"}]}),
            ..Default::default()
        });
        let client = ApiClient::with_transport(recorder.clone());

        let clusters = client.cluster_list("p-1").await.unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].name, "prod");

        let calls = recorder.calls.lock().unwrap();
        assert_eq!(calls[0].0, "metalstackcloud.api.v1.ClusterService/List");
        assert_eq!(calls[0].1, json!({"project": "p-1"}));
    }

    #[tokio::test]
    async fn test_credentials_send_proto_duration() {
        let recorder = Arc::new(Recorder {
            response: json!({"kubeconfig": "apiVersion: v1"}),
            ..Default::default()
        });
        let client = ApiClient::with_transport(recorder.clone());

        let kubeconfig = client
            .cluster_credentials("p-1", "c-1", Duration::from_secs(3600))
            .await
            .unwrap();
        assert_eq!(kubeconfig, "apiVersion: v1");

        let calls = recorder.calls.lock().unwrap();
        assert_eq!(calls[0].1["expiration"], json!("3600s"));
    }

    #[tokio::test]
    async fn test_empty_response_decodes_defaults() {
        let recorder = Arc::new(Recorder {
            response: json!({}),
            ..Default::default()
        });
        let client = ApiClient::with_transport(recorder);
        assert!(client.token_list().await.unwrap().is_empty());
        client.token_revoke("t-1").await.unwrap();
    }
}
