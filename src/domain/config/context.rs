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

//! The CLI configuration file holding named API contexts

use crate::infrastructure::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_CONTEXT_NAME, ENV_CONFIG,
};
use crate::shared::error::{CliError, Result};
use crate::shared::files::write_private;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Argument of `context switch` selecting the previously active context
pub const PREVIOUS_CONTEXT: &str = "-";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Context {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_project: Option<String>,
    /// Request timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

impl Context {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct CliConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_context: Option<String>,
    pub contexts: Vec<Context>,
}

impl CliConfig {
    /// Config path: explicit flag, then `METAL_STACK_CLOUD_CONFIG`, then the home directory.
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }
        if let Ok(path) = std::env::var(ENV_CONFIG) {
            if !path.is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::config_error("unable to determine home directory"))?;
        Ok(home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load the config file; a missing file yields an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file does not exist, using empty config");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        // the file holds API tokens
        write_private(path, &content)?;

        tracing::debug!(path = %path.display(), "config file written");
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == name)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Context> {
        self.contexts.iter_mut().find(|c| c.name == name)
    }

    pub fn current(&self) -> Option<&Context> {
        self.current_context.as_deref().and_then(|name| self.get(name))
    }

    pub fn is_current(&self, name: &str) -> bool {
        self.current_context.as_deref() == Some(name)
    }

    pub fn add(&mut self, context: Context, activate: bool) -> Result<()> {
        if context.name.is_empty() || context.name == PREVIOUS_CONTEXT {
            return Err(CliError::invalid_argument(format!(
                "invalid context name '{}'",
                context.name
            )));
        }
        if self.get(&context.name).is_some() {
            return Err(CliError::config_error(format!(
                "context '{}' already exists",
                context.name
            )));
        }

        let name = context.name.clone();
        self.contexts.push(context);
        if activate || self.current_context.is_none() {
            self.activate(&name);
        }
        Ok(())
    }

    pub fn update<F>(&mut self, name: &str, apply: F) -> Result<()>
    where
        F: FnOnce(&mut Context),
    {
        let context = self
            .get_mut(name)
            .ok_or_else(|| CliError::config_error(format!("context '{}' not found", name)))?;
        apply(context);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<Context> {
        let index = self
            .contexts
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| CliError::config_error(format!("context '{}' not found", name)))?;

        if self.current_context.as_deref() == Some(name) {
            self.current_context = None;
        }
        if self.previous_context.as_deref() == Some(name) {
            self.previous_context = None;
        }
        Ok(self.contexts.remove(index))
    }

    /// Switch the active context; `-` goes back to the previous one.
    pub fn switch(&mut self, name: &str) -> Result<String> {
        let target = if name == PREVIOUS_CONTEXT {
            self.previous_context
                .clone()
                .ok_or_else(|| CliError::config_error("no previous context to switch to"))?
        } else {
            name.to_string()
        };

        if self.get(&target).is_none() {
            return Err(CliError::config_error(format!(
                "context '{}' not found",
                target
            )));
        }

        self.activate(&target);
        Ok(target)
    }

    fn activate(&mut self, name: &str) {
        if self.current_context.as_deref() == Some(name) {
            return;
        }
        self.previous_context = self.current_context.take();
        self.current_context = Some(name.to_string());
    }

    pub fn set_project(&mut self, project: &str) -> Result<()> {
        let current = self
            .current_context
            .clone()
            .ok_or_else(|| CliError::config_error("no context is active"))?;
        self.update(&current, |c| {
            c.default_project = if project.is_empty() {
                None
            } else {
                Some(project.to_string())
            };
        })
    }

    /// Store a token in the named context, or in the current one.
    ///
    /// Without any context the default context is created and activated.
    pub fn set_token(
        &mut self,
        context: Option<&str>,
        token: &str,
        provider: Option<&str>,
    ) -> Result<String> {
        let name = match context.map(str::to_string).or_else(|| self.current_context.clone()) {
            Some(name) if context.is_some() || self.get(&name).is_some() => name,
            _ => {
                if self.get(DEFAULT_CONTEXT_NAME).is_none() {
                    self.contexts.push(Context::new(DEFAULT_CONTEXT_NAME));
                }
                self.activate(DEFAULT_CONTEXT_NAME);
                DEFAULT_CONTEXT_NAME.to_string()
            }
        };

        self.update(&name, |c| {
            c.api_token = Some(token.to_string());
            if let Some(p) = provider {
                c.provider = Some(p.to_string());
            }
        })?;
        Ok(name)
    }

    /// Remove the token of the named context, or of the current one.
    pub fn clear_token(&mut self, context: Option<&str>) -> Result<String> {
        let name = context
            .map(str::to_string)
            .or_else(|| self.current_context.clone())
            .ok_or_else(|| CliError::config_error("no context is active"))?;
        self.update(&name, |c| c.api_token = None)?;
        Ok(name)
    }
}
