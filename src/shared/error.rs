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

use thiserror::Error;
pub type Result<T> = std::result::Result<T, CliError>;

/// Connect error code returned when an entity does not exist.
pub const CODE_NOT_FOUND: &str = "not_found";

#[derive(Error, Debug)]
pub enum CliError {
    #[error("API error ({code}): {message}")]
    Api { code: String, message: String },

    #[error("HTTP transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{operation} is not supported for {kind}")]
    NotSupported {
        kind: &'static str,
        operation: &'static str,
    },

    #[error("Template error: {0}")]
    Template(String),

    #[error("Kubeconfig error: {0}")]
    Kubeconfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl From<reqwest::Error> for CliError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CliError::Api {
                code: "deadline_exceeded".to_string(),
                message: err.to_string(),
            }
        } else {
            CliError::Transport(err.to_string())
        }
    }
}

impl From<kube::config::KubeconfigError> for CliError {
    fn from(err: kube::config::KubeconfigError) -> Self {
        CliError::Kubeconfig(err.to_string())
    }
}

impl CliError {
    pub fn api(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn config_error(context: impl Into<String>) -> Self {
        Self::ConfigError(context.into())
    }

    pub fn invalid_argument(context: impl Into<String>) -> Self {
        Self::InvalidArgument(context.into())
    }

    pub fn not_supported(kind: &'static str, operation: &'static str) -> Self {
        Self::NotSupported { kind, operation }
    }

    /// Whether the remote side reported that the requested entity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { code, .. } if code == CODE_NOT_FOUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = CliError::api("permission_denied", "token has no access");
        assert_eq!(
            err.to_string(),
            "API error (permission_denied): token has no access"
        );
    }

    #[test]
    fn test_is_not_found() {
        assert!(CliError::api(CODE_NOT_FOUND, "cluster not found").is_not_found());
        assert!(!CliError::api("internal", "boom").is_not_found());
        assert!(!CliError::config_error("missing").is_not_found());
    }

    #[test]
    fn test_not_supported_display() {
        let err = CliError::not_supported("snapshot", "create");
        assert_eq!(err.to_string(), "create is not supported for snapshot");
    }
}
