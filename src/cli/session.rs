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

//! Everything a command needs for one invocation

use crate::cli::commands::GlobalArgs;
use crate::cli::display::Printer;
use crate::domain::config::{CliConfig, Settings, SettingsOverrides};
use crate::infrastructure::api::ApiClient;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub struct Session {
    pub config_path: PathBuf,
    pub config: CliConfig,
    pub settings: Settings,
    pub printer: Printer,
    pub client: ApiClient,
}

impl Session {
    pub fn from_args(args: &GlobalArgs) -> Result<Self> {
        let config_path = CliConfig::resolve_path(args.config.as_deref())?;
        let config = CliConfig::load(&config_path)
            .with_context(|| format!("failed to load {}", config_path.display()))?;

        let settings = Settings::resolve(&config, &args.overrides())?;
        tracing::debug!(
            context = settings.context_name.as_deref().unwrap_or("-"),
            api_url = %settings.api_url,
            "resolved settings"
        );

        let printer = Printer::new(
            args.output_format,
            args.template.as_deref(),
            args.color_mode(),
        )?;
        let client = ApiClient::new(&settings)?;

        Ok(Self {
            config_path,
            config,
            settings,
            printer,
            client,
        })
    }

    /// Session over an already built client, used by tests.
    pub fn new(
        config_path: PathBuf,
        config: CliConfig,
        printer: Printer,
        client: ApiClient,
    ) -> Result<Self> {
        let settings = Settings::resolve(&config, &SettingsOverrides::default())?;
        Ok(Self {
            config_path,
            config,
            settings,
            printer,
            client,
        })
    }

    /// Project of project-scoped commands.
    pub fn project(&self) -> Result<String> {
        Ok(self.settings.require_project()?)
    }

    pub fn save_config(&self, config: &CliConfig) -> Result<()> {
        config
            .save(&self.config_path)
            .with_context(|| format!("failed to write {}", self.config_path.display()))
    }
}
