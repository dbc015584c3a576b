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

use metal_cli::domain::config::{CliConfig, Context, Settings, SettingsOverrides};
use metal_cli::{ApiClient, CliError, HttpTransport, Transport};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport(server: &MockServer, token: Option<&str>) -> HttpTransport {
    HttpTransport::new(
        &server.uri(),
        token.map(str::to_string),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_unary_call_sends_connect_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/metalstackcloud.api.v1.ClusterService/List"))
        .and(header("Connect-Protocol-Version", "1"))
        .and(header("Authorization", "Bearer secret"))
        .and(body_json(json!({"project": "p-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "clusters": [{"uuid": "c-1", "name": "prod", "project": "p-1"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::with_transport(Arc::new(transport(&server, Some("secret"))));
    let clusters = client.cluster_list("p-1").await.unwrap();

    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].name, "prod");
}

#[tokio::test]
async fn test_no_authorization_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/metalstackcloud.api.v1.HealthService/Get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "health": {"services": [{"name": "api", "status": "SERVICE_STATUS_HEALTHY"}]}
        })))
        .mount(&server)
        .await;

    let client = ApiClient::with_transport(Arc::new(transport(&server, None)));
    let health = client.health().await.unwrap();
    assert!(health.services[0].is_serving());

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_connect_error_is_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "not_found",
            "message": "ip ip-1 not found"
        })))
        .mount(&server)
        .await;

    let client = ApiClient::with_transport(Arc::new(transport(&server, Some("t"))));
    let err = client.ip_get("p-1", "ip-1").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "API error (not_found): ip ip-1 not found");
}

#[tokio::test]
async fn test_plain_error_body_maps_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let t = transport(&server, Some("t"));
    match t.unary("metalstackcloud.api.v1.TokenService/List", json!({})).await {
        Err(CliError::Api { code, message }) => {
            assert_eq!(code, "permission_denied");
            assert_eq!(message, "forbidden");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_timeout_is_deadline_exceeded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let t = HttpTransport::new(&server.uri(), None, Duration::from_millis(100)).unwrap();
    match t.unary("metalstackcloud.api.v1.VersionService/Get", json!({})).await {
        Err(CliError::Api { code, .. }) => assert_eq!(code, "deadline_exceeded"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_client_from_settings_uses_context() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/metalstackcloud.api.v1.VersionService/Get"))
        .and(header("Authorization", "Bearer ctx-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": {"version": "v1.2.3", "revision": "abc", "buildDate": "2025-01-01"}
        })))
        .mount(&server)
        .await;

    let mut config = CliConfig::default();
    let mut context = Context::new("test");
    context.api_url = Some(format!("{}/", server.uri()));
    context.api_token = Some("ctx-token".to_string());
    config.add(context, true).unwrap();

    let settings = Settings::resolve(&config, &SettingsOverrides::default()).unwrap();
    let client = ApiClient::new(&settings).unwrap();
    let version = client.version().await.unwrap();

    assert_eq!(version.version, "v1.2.3");
    assert_eq!(version.build_date, "2025-01-01");
}
