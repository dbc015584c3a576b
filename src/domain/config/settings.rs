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

use super::context::{CliConfig, Context};
use crate::infrastructure::constants::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use crate::shared::error::{CliError, Result};
use std::time::Duration;

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub context: Option<String>,
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub project: Option<String>,
    pub timeout: Option<u64>,
}

/// Effective settings of one invocation.
///
/// Priority: command line / environment > selected context > defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub context_name: Option<String>,
    pub api_url: String,
    pub api_token: Option<String>,
    pub project: Option<String>,
    pub provider: Option<String>,
    pub timeout: Duration,
}

impl Settings {
    pub fn resolve(config: &CliConfig, overrides: &SettingsOverrides) -> Result<Self> {
        let context: Option<&Context> = match overrides.context.as_deref() {
            Some(name) => Some(config.get(name).ok_or_else(|| {
                CliError::config_error(format!("context '{}' not found", name))
            })?),
            None => config.current(),
        };

        let api_url = overrides
            .api_url
            .clone()
            .or_else(|| context.and_then(|c| c.api_url.clone()))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let api_token = overrides
            .api_token
            .clone()
            .or_else(|| context.and_then(|c| c.api_token.clone()))
            .filter(|t| !t.is_empty());

        let project = overrides
            .project
            .clone()
            .or_else(|| context.and_then(|c| c.default_project.clone()))
            .filter(|p| !p.is_empty());

        let timeout = overrides
            .timeout
            .or_else(|| context.and_then(|c| c.timeout))
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            context_name: context.map(|c| c.name.clone()),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_token,
            project,
            provider: context.and_then(|c| c.provider.clone()),
            timeout: Duration::from_secs(timeout),
        })
    }

    /// Project for a project-scoped command.
    pub fn require_project(&self) -> Result<String> {
        self.project
            .clone()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                CliError::invalid_argument(
                    "no project given, use --project or set a default with `metal context set-project`",
                )
            })
    }
}
