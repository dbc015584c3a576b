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

//! API tokens, their permissions and roles

use crate::shared::error::{CliError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const PROJECT_ROLES: &[&str] = &[
    "PROJECT_ROLE_OWNER",
    "PROJECT_ROLE_EDITOR",
    "PROJECT_ROLE_VIEWER",
];
pub const TENANT_ROLES: &[&str] = &[
    "TENANT_ROLE_OWNER",
    "TENANT_ROLE_EDITOR",
    "TENANT_ROLE_VIEWER",
    "TENANT_ROLE_GUEST",
];
pub const ADMIN_ROLES: &[&str] = &["ADMIN_ROLE_EDITOR", "ADMIN_ROLE_VIEWER"];

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct MethodPermission {
    /// Project or tenant the methods are granted on, `*` for any
    pub subject: String,
    pub methods: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Token {
    pub uuid: String,
    pub user: String,
    pub description: String,
    pub permissions: Vec<MethodPermission>,
    pub project_roles: BTreeMap<String, String>,
    pub tenant_roles: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_role: Option<String>,
    pub token_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<DateTime<Utc>>,
}

impl Token {
    pub fn is_admin(&self) -> bool {
        self.admin_role.as_deref().is_some_and(|r| !r.is_empty())
    }

    pub fn role_count(&self) -> usize {
        self.project_roles.len() + self.tenant_roles.len()
    }

    pub fn method_count(&self) -> usize {
        self.permissions.iter().map(|p| p.methods.len()).sum()
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenServiceCreateRequest {
    pub description: String,
    pub permissions: Vec<MethodPermission>,
    pub project_roles: BTreeMap<String, String>,
    pub tenant_roles: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_role: Option<String>,
    /// Protojson duration
    pub expires: String,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenServiceUpdateRequest {
    pub uuid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<MethodPermission>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_roles: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_roles: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_role: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenResponse {
    pub token: Token,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenCreateResponse {
    pub token: Token,
    /// Only returned once, on creation
    pub secret: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenListResponse {
    pub tokens: Vec<Token>,
}

/// Parse `subject=/service/Method` permission flags, merging methods of the same subject.
pub fn parse_permissions(raw: &[String]) -> Result<Vec<MethodPermission>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for entry in raw {
        let (subject, method) = entry.split_once('=').ok_or_else(|| {
            CliError::invalid_argument(format!(
                "permission '{}' must have the form <subject>=<method>",
                entry
            ))
        })?;
        if subject.trim().is_empty() || method.trim().is_empty() {
            return Err(CliError::invalid_argument(format!(
                "permission '{}' has an empty subject or method",
                entry
            )));
        }
        grouped
            .entry(subject.trim().to_string())
            .or_default()
            .push(method.trim().to_string());
    }

    Ok(grouped
        .into_iter()
        .map(|(subject, methods)| MethodPermission { subject, methods })
        .collect())
}

/// Parse `subject=ROLE` role flags against the allowed role names.
///
/// Short role names (`owner`, `viewer`) are expanded with the given prefix.
pub fn parse_roles(
    raw: &[String],
    prefix: &str,
    allowed: &[&str],
) -> Result<BTreeMap<String, String>> {
    let mut roles = BTreeMap::new();
    for entry in raw {
        let (subject, role) = entry.split_once('=').ok_or_else(|| {
            CliError::invalid_argument(format!("role '{}' must have the form <subject>=<role>", entry))
        })?;
        let role = normalize_role(role, prefix);
        if !allowed.contains(&role.as_str()) {
            return Err(CliError::invalid_argument(format!(
                "unknown role '{}', allowed: {}",
                role,
                allowed.join(", ")
            )));
        }
        roles.insert(subject.trim().to_string(), role);
    }
    Ok(roles)
}

pub fn normalize_role(role: &str, prefix: &str) -> String {
    let upper = role.trim().to_uppercase();
    if upper.starts_with(prefix) {
        upper
    } else {
        format!("{}{}", prefix, upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_permissions_groups_by_subject() {
        let raw = vec![
            "p-1=/metalstackcloud.api.v1.ClusterService/List".to_string(),
            "p-1=/metalstackcloud.api.v1.ClusterService/Get".to_string(),
            "*=/metalstackcloud.api.v1.HealthService/Get".to_string(),
        ];
        let perms = parse_permissions(&raw).unwrap();
        assert_eq!(perms.len(), 2);
        assert_eq!(perms[0].subject, "*");
        assert_eq!(perms[1].subject, "p-1");
        assert_eq!(perms[1].methods.len(), 2);
    }

    #[test]
    fn test_parse_permissions_rejects_malformed() {
        assert!(parse_permissions(&["no-equals".to_string()]).is_err());
        assert!(parse_permissions(&["=/x".to_string()]).is_err());
    }

    #[test]
    fn test_parse_roles_expands_short_names() {
        let roles = parse_roles(
            &["p-1=viewer".to_string(), "p-2=PROJECT_ROLE_OWNER".to_string()],
            "PROJECT_ROLE_",
            PROJECT_ROLES,
        )
        .unwrap();
        assert_eq!(roles["p-1"], "PROJECT_ROLE_VIEWER");
        assert_eq!(roles["p-2"], "PROJECT_ROLE_OWNER");

        assert!(parse_roles(&["p-1=superuser".to_string()], "PROJECT_ROLE_", PROJECT_ROLES).is_err());
    }

    #[test]
    fn test_token_counts() {
        let token = Token {
            permissions: vec![MethodPermission {
                subject: "p".to_string(),
                methods: vec!["a".to_string(), "b".to_string()],
            }],
            project_roles: BTreeMap::from([("p".to_string(), "PROJECT_ROLE_VIEWER".to_string())]),
            admin_role: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(token.method_count(), 2);
        assert_eq!(token.role_count(), 1);
        assert!(!token.is_admin());
    }
}
