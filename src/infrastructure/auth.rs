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

//! Browser login and local inspection of API tokens

use crate::infrastructure::constants::LOGIN_CALLBACK_PATH;
use crate::shared::error::{CliError, Result};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Claims of a metalstack.cloud API token.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TokenClaims {
    pub sub: String,
    pub iss: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub token_type: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub roles: BTreeMap<String, String>,
}

impl TokenClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| Utc.timestamp_opt(secs, 0).single())
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.iat.and_then(|secs| Utc.timestamp_opt(secs, 0).single())
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|at| at <= now)
    }
}

/// Decode the payload of a JWT without verifying its signature.
pub fn decode_claims(token: &str) -> Result<TokenClaims> {
    let mut parts = token.trim().split('.');
    let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return Err(CliError::invalid_argument("API token is not a JWT")),
    };

    // some issuers pad the segments
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| CliError::invalid_argument(format!("API token payload is not base64: {}", e)))?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// URL that starts the login flow at the given provider.
pub fn login_url(api_url: &str, provider: &str, port: u16) -> String {
    format!(
        "{}/auth/{}?redirect-url=http://localhost:{}{}",
        api_url.trim_end_matches('/'),
        provider,
        port,
        LOGIN_CALLBACK_PATH
    )
}

#[derive(Debug, Deserialize)]
struct CallbackParams {
    token: Option<String>,
}

type TokenSender = Arc<Mutex<Option<oneshot::Sender<String>>>>;

async fn callback(
    State(sender): State<TokenSender>,
    Query(params): Query<CallbackParams>,
) -> (StatusCode, &'static str) {
    let Some(token) = params.token.filter(|t| !t.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "no token in callback\n");
    };

    let sender = sender.lock().ok().and_then(|mut s| s.take());
    match sender.map(|tx| tx.send(token)) {
        Some(Ok(())) => (StatusCode::OK, "Login successful, you can close this window.\n"),
        _ => (StatusCode::GONE, "login already completed\n"),
    }
}

/// Local listener receiving the token of a browser login.
pub struct LoginListener {
    listener: TcpListener,
}

impl LoginListener {
    /// Bind on a random loopback port.
    pub async fn bind() -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        Ok(Self { listener })
    }

    pub fn port(&self) -> Result<u16> {
        Ok(self.listener.local_addr()?.port())
    }

    /// Serve the callback route until a token arrives or `timeout` elapses.
    pub async fn wait_for_token(self, timeout: Duration) -> Result<String> {
        let (token_tx, token_rx) = oneshot::channel::<String>();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = Router::new()
            .route(LOGIN_CALLBACK_PATH, get(callback))
            .with_state(Arc::new(Mutex::new(Some(token_tx))));

        let server = tokio::spawn(async move {
            axum::serve(self.listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        let outcome = tokio::time::timeout(timeout, token_rx).await;
        let _ = shutdown_tx.send(());
        match server.await {
            Ok(Err(e)) => tracing::warn!(error = %e, "login listener failed"),
            Err(e) => tracing::warn!(error = %e, "login listener panicked"),
            Ok(Ok(())) => tracing::debug!("login listener stopped"),
        }

        match outcome {
            Ok(Ok(token)) => Ok(token),
            Ok(Err(_)) => Err(CliError::Transport(
                "login listener stopped before receiving a token".to_string(),
            )),
            Err(_) => Err(CliError::api(
                "deadline_exceeded",
                format!("no login callback within {}s", timeout.as_secs()),
            )),
        }
    }
}

/// Try to open `url` in a browser; failures only get logged.
pub async fn open_browser(url: &str) {
    for opener in ["xdg-open", "open"] {
        match tokio::process::Command::new(opener)
            .arg(url)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .await
        {
            Ok(status) if status.success() => return,
            Ok(status) => tracing::debug!(opener, %status, "browser opener failed"),
            Err(e) => tracing::debug!(opener, error = %e, "browser opener not available"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn jwt(claims: serde_json::Value) -> String {
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("eyJhbGciOiJFUzUxMiJ9.{}.c2lnbmF0dXJl", payload)
    }

    #[test]
    fn test_decode_claims() {
        let token = jwt(json!({
            "sub": "jane@github",
            "iss": "https://api.metalstack.cloud",
            "exp": 4102444800i64,
            "type": "TOKEN_TYPE_API",
            "roles": {"p-1": "PROJECT_ROLE_OWNER"}
        }));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.sub, "jane@github");
        assert_eq!(claims.roles["p-1"], "PROJECT_ROLE_OWNER");
        assert!(!claims.is_expired(Utc::now()));
        assert_eq!(claims.expires_at().unwrap().to_rfc3339(), "2100-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_expired_claims() {
        let claims = decode_claims(&jwt(json!({"sub": "x", "exp": 1}))).unwrap();
        assert!(claims.is_expired(Utc::now()));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_claims("not-a-token").is_err());
        assert!(decode_claims("a.%%%.c").is_err());
    }

    #[test]
    fn test_login_url() {
        assert_eq!(
            login_url("https://api.metalstack.cloud/", "github", 4711),
            "https://api.metalstack.cloud/auth/github?redirect-url=http://localhost:4711/callback"
        );
    }

    #[tokio::test]
    async fn test_listener_receives_token() {
        let listener = LoginListener::bind().await.unwrap();
        let port = listener.port().unwrap();
        let waiting = tokio::spawn(listener.wait_for_token(Duration::from_secs(10)));

        let url = format!("http://127.0.0.1:{}/callback?token=abc", port);
        let response = reqwest::get(&url).await.unwrap();
        assert!(response.status().is_success());
        assert_eq!(waiting.await.unwrap().unwrap(), "abc");
    }

    #[tokio::test]
    async fn test_listener_times_out() {
        let listener = LoginListener::bind().await.unwrap();
        let err = listener
            .wait_for_token(Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no login callback"));
    }
}
