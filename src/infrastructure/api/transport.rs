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

//! Connect unary calls with JSON payloads over HTTP

use crate::infrastructure::constants::{
    CONNECT_PROTOCOL_VERSION, CONNECT_PROTOCOL_VERSION_HEADER, CONNECT_TIMEOUT_HEADER,
};
use crate::shared::error::{CliError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Invoke `procedure` (`<package>.<Service>/<Method>`) with a JSON request.
    async fn unary(&self, procedure: &str, request: Value) -> Result<Value>;
}

pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("metal-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CliError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            timeout,
        })
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn unary(&self, procedure: &str, request: Value) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, procedure);
        let started = Instant::now();

        let mut builder = self
            .http
            .post(&url)
            .header(CONNECT_PROTOCOL_VERSION_HEADER, CONNECT_PROTOCOL_VERSION)
            .header(CONNECT_TIMEOUT_HEADER, self.timeout.as_millis().to_string())
            .timeout(self.timeout)
            .json(&request);
        if let Some(ref token) = self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        tracing::debug!(
            procedure,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "api call finished"
        );

        if status.is_success() {
            if body.is_empty() {
                return Ok(Value::Object(Default::default()));
            }
            return Ok(serde_json::from_slice(&body)?);
        }

        Err(decode_error(status.as_u16(), &body))
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ConnectError {
    code: String,
    message: String,
}

/// Decode a Connect error body, falling back to the HTTP status mapping.
pub fn decode_error(status: u16, body: &[u8]) -> CliError {
    match serde_json::from_slice::<ConnectError>(body) {
        Ok(err) if !err.code.is_empty() => CliError::api(err.code, err.message),
        _ => {
            let text = String::from_utf8_lossy(body).trim().to_string();
            let message = if text.is_empty() {
                format!("HTTP status {}", status)
            } else {
                text
            };
            CliError::api(code_from_http_status(status), message)
        }
    }
}

pub fn code_from_http_status(status: u16) -> &'static str {
    match status {
        400 => "internal",
        401 => "unauthenticated",
        403 => "permission_denied",
        404 => "unimplemented",
        429 | 502 | 503 | 504 => "unavailable",
        _ => "unknown",
    }
}
