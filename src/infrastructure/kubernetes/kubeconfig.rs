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

//! Merging cluster credentials into a local kubeconfig

use crate::infrastructure::constants::{ENV_KUBECONFIG, KUBECONFIG_CONTEXT_PREFIX};
use crate::shared::error::{CliError, Result};
use crate::shared::files::write_private;
use kube::config::Kubeconfig;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Target kubeconfig: explicit path, first entry of `$KUBECONFIG`, then `~/.kube/config`.
pub fn resolve_kubeconfig_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Ok(value) = std::env::var(ENV_KUBECONFIG) {
        if let Some(first) = std::env::split_paths(&value).find(|p| !p.as_os_str().is_empty()) {
            return Ok(first);
        }
    }

    let home = dirs::home_dir()
        .ok_or_else(|| CliError::Kubeconfig("unable to determine home directory".to_string()))?;
    Ok(home.join(".kube").join("config"))
}

/// Name of the kubeconfig context created for a cluster.
pub fn context_name(project: &str, cluster_name: &str) -> String {
    format!("{}-{}-{}", KUBECONFIG_CONTEXT_PREFIX, project, cluster_name)
}

/// Merge `incoming` into `existing`.
///
/// Entries of `existing` sharing a name with an incoming entry are replaced. The
/// incoming current context is renamed to `context_name`; it becomes the current
/// context when `activate` is set or when `existing` has none.
pub fn merge(
    mut existing: Kubeconfig,
    mut incoming: Kubeconfig,
    context_name: &str,
    activate: bool,
) -> Result<Kubeconfig> {
    let source_context = incoming
        .current_context
        .clone()
        .or_else(|| incoming.contexts.first().map(|c| c.name.clone()))
        .ok_or_else(|| CliError::Kubeconfig("credentials contain no context".to_string()))?;

    let mut renamed = false;
    for ctx in incoming.contexts.iter_mut() {
        if ctx.name == source_context {
            ctx.name = context_name.to_string();
            renamed = true;
        }
    }
    if !renamed {
        return Err(CliError::Kubeconfig(format!(
            "current context '{}' is not defined in the credentials",
            source_context
        )));
    }
    incoming.current_context = Some(context_name.to_string());

    let clusters: HashSet<String> = incoming.clusters.iter().map(|c| c.name.clone()).collect();
    let users: HashSet<String> = incoming.auth_infos.iter().map(|u| u.name.clone()).collect();
    let contexts: HashSet<String> = incoming.contexts.iter().map(|c| c.name.clone()).collect();

    existing.clusters.retain(|c| !clusters.contains(&c.name));
    existing.auth_infos.retain(|u| !users.contains(&u.name));
    existing.contexts.retain(|c| !contexts.contains(&c.name));

    let previous_current = existing
        .current_context
        .clone()
        .filter(|name| existing.contexts.iter().any(|c| &c.name == name));

    let mut merged = existing.merge(incoming)?;
    merged.current_context = if activate {
        Some(context_name.to_string())
    } else {
        previous_current.or_else(|| Some(context_name.to_string()))
    };

    Ok(merged)
}

/// Merge the kubeconfig text returned by the API into the file at `path`.
pub fn merge_into_file(
    path: &Path,
    credentials: &str,
    context_name: &str,
    activate: bool,
) -> Result<Kubeconfig> {
    let existing = if path.exists() {
        Kubeconfig::read_from(path)?
    } else {
        Kubeconfig::default()
    };
    let incoming = Kubeconfig::from_yaml(credentials)?;

    let merged = merge(existing, incoming, context_name, activate)?;

    write_private(path, &serde_yaml::to_string(&merged)?)?;

    tracing::info!(path = %path.display(), context = context_name, "kubeconfig merged");
    Ok(merged)
}
