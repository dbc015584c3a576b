//! API token commands

use crate::cli::genericcli::{
    non_empty, CrudResource, DeleteArgs, DescribeArgs, GenericCli, SortArgs, SortKeys,
};
use crate::cli::session::Session;
use crate::domain::api::token::{
    normalize_role, parse_permissions, parse_roles, ADMIN_ROLES, PROJECT_ROLES, TENANT_ROLES,
};
use crate::domain::api::{Token, TokenServiceCreateRequest, TokenServiceUpdateRequest};
use crate::infrastructure::api::ApiClient;
use crate::infrastructure::constants::DEFAULT_TOKEN_EXPIRATION;
use crate::shared::duration::{parse_duration, to_proto_duration};
use crate::shared::error::{CliError, Result as CliResult};
use async_trait::async_trait;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::collections::BTreeMap;
use std::time::Duration;

pub struct TokenResource {
    client: ApiClient,
}

impl TokenResource {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CrudResource for TokenResource {
    type Entity = Token;
    type Create = TokenServiceCreateRequest;
    type Update = TokenServiceUpdateRequest;
    type Filter = ();

    const KIND: &'static str = "token";

    async fn list(&self, _filter: &()) -> CliResult<Vec<Token>> {
        self.client.token_list().await
    }

    async fn get(&self, id: &str) -> CliResult<Token> {
        self.client.token_get(id).await
    }

    async fn create(&self, rq: TokenServiceCreateRequest) -> CliResult<Token> {
        Ok(self.client.token_create(&rq).await?.token)
    }

    async fn update(&self, rq: TokenServiceUpdateRequest) -> CliResult<Token> {
        self.client.token_update(&rq).await
    }

    /// Revoking returns nothing, the token is fetched first to report it.
    async fn delete(&self, id: &str) -> CliResult<Token> {
        let token = self.client.token_get(id).await?;
        self.client.token_revoke(id).await?;
        Ok(token)
    }

    fn id(entity: &Token) -> Option<String> {
        non_empty(&entity.uuid)
    }

    fn update_request_from(&self, entity: &Token) -> CliResult<TokenServiceUpdateRequest> {
        if entity.uuid.is_empty() {
            return Err(CliError::invalid_argument("token has no uuid"));
        }
        Ok(TokenServiceUpdateRequest {
            uuid: entity.uuid.clone(),
            description: Some(entity.description.clone()),
            permissions: Some(entity.permissions.clone()),
            project_roles: Some(entity.project_roles.clone()),
            tenant_roles: Some(entity.tenant_roles.clone()),
            admin_role: entity.admin_role.clone(),
        })
    }

    fn sort_keys(&self) -> SortKeys<Token> {
        SortKeys::new()
            .key("type", |a: &Token, b: &Token| a.token_type.cmp(&b.token_type))
            .key("id", |a: &Token, b: &Token| a.uuid.cmp(&b.uuid))
            .key("user", |a: &Token, b: &Token| a.user.cmp(&b.user))
            .key("expires", |a: &Token, b: &Token| a.expires.cmp(&b.expires))
            .defaults(&["type", "expires"])
    }
}

#[derive(Subcommand, Debug)]
pub enum TokenCommand {
    /// List your API tokens
    List(TokenListCommand),

    /// Show a token
    Describe(DescribeArgs),

    /// Create a token, the secret is printed once
    Create(TokenCreateCommand),

    /// Update description, permissions or roles of a token
    Update(TokenUpdateCommand),

    /// Revoke tokens
    Delete(DeleteArgs),
}

#[derive(Parser, Debug, Clone, Default)]
pub struct TokenListCommand {
    #[command(flatten)]
    pub sort: SortArgs,
}

/// Permission and role flags of token create and update
#[derive(Args, Debug, Clone, Default)]
pub struct TokenGrants {
    /// Method permissions as <subject>=<method>, repeatable
    #[arg(long, value_delimiter = ',')]
    pub permissions: Vec<String>,

    /// Project roles as <project>=<role>, e.g. p-1=viewer
    #[arg(long, value_delimiter = ',')]
    pub project_roles: Vec<String>,

    /// Tenant roles as <tenant>=<role>, e.g. acme@github=owner
    #[arg(long, value_delimiter = ',')]
    pub tenant_roles: Vec<String>,

    /// Admin role, editor or viewer
    #[arg(long)]
    pub admin_role: Option<String>,
}

impl TokenGrants {
    fn project_roles(&self) -> CliResult<BTreeMap<String, String>> {
        parse_roles(&self.project_roles, "PROJECT_ROLE_", PROJECT_ROLES)
    }

    fn tenant_roles(&self) -> CliResult<BTreeMap<String, String>> {
        parse_roles(&self.tenant_roles, "TENANT_ROLE_", TENANT_ROLES)
    }

    fn admin_role(&self) -> CliResult<Option<String>> {
        let Some(role) = &self.admin_role else {
            return Ok(None);
        };
        let role = normalize_role(role, "ADMIN_ROLE_");
        if !ADMIN_ROLES.contains(&role.as_str()) {
            return Err(CliError::invalid_argument(format!(
                "unknown admin role '{}', allowed: {}",
                role,
                ADMIN_ROLES.join(", ")
            )));
        }
        Ok(Some(role))
    }
}

#[derive(Parser, Debug, Clone)]
pub struct TokenCreateCommand {
    #[arg(long, default_value = "")]
    pub description: String,

    /// Lifetime of the token, e.g. 8h or 30d
    #[arg(long, default_value = DEFAULT_TOKEN_EXPIRATION)]
    pub expires: String,

    #[command(flatten)]
    pub grants: TokenGrants,
}

impl TokenCreateCommand {
    pub fn to_request(&self) -> CliResult<TokenServiceCreateRequest> {
        let expires = parse_duration(&self.expires)?;
        if expires.is_zero() {
            return Err(CliError::invalid_argument("--expires must be positive"));
        }
        Ok(TokenServiceCreateRequest {
            description: self.description.clone(),
            permissions: parse_permissions(&self.grants.permissions)?,
            project_roles: self.grants.project_roles()?,
            tenant_roles: self.grants.tenant_roles()?,
            admin_role: self.grants.admin_role()?,
            expires: to_proto_duration(expires),
        })
    }
}

#[derive(Parser, Debug, Clone, Default)]
pub struct TokenUpdateCommand {
    /// Token id
    pub id: String,

    #[arg(long)]
    pub description: Option<String>,

    #[command(flatten)]
    pub grants: TokenGrants,
}

impl TokenUpdateCommand {
    /// Only flags that were given replace the token's values.
    pub fn to_request(&self) -> CliResult<TokenServiceUpdateRequest> {
        let g = &self.grants;
        Ok(TokenServiceUpdateRequest {
            uuid: self.id.clone(),
            description: self.description.clone(),
            permissions: (!g.permissions.is_empty())
                .then(|| parse_permissions(&g.permissions))
                .transpose()?,
            project_roles: (!g.project_roles.is_empty())
                .then(|| g.project_roles())
                .transpose()?,
            tenant_roles: (!g.tenant_roles.is_empty())
                .then(|| g.tenant_roles())
                .transpose()?,
            admin_role: g.admin_role()?,
        })
    }
}

/// Remaining lifetime of a token, zero once expired.
pub fn remaining(token: &Token) -> Duration {
    token
        .expires
        .and_then(|at| (at - Utc::now()).to_std().ok())
        .unwrap_or_default()
}

impl TokenCommand {
    pub async fn execute(&self, session: &Session) -> anyhow::Result<()> {
        let cli = GenericCli::new(TokenResource::new(session.client.clone()), &session.printer);

        match self {
            TokenCommand::List(cmd) => cli.list_and_print(&(), &cmd.sort).await,
            TokenCommand::Describe(args) => cli.describe_and_print(&args.id).await,
            TokenCommand::Create(cmd) => {
                let created = session.client.token_create(&cmd.to_request()?).await?;
                tracing::info!(
                    uuid = %created.token.uuid,
                    expires_in = %crate::shared::duration::humanize(remaining(&created.token)),
                    "token created"
                );
                session.printer.print_value(&created)?;
                Ok(())
            }
            TokenCommand::Update(cmd) => cli.update_and_print(cmd.to_request()?).await,
            TokenCommand::Delete(args) => cli.delete_and_print(args).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(expires: &str) -> TokenCreateCommand {
        TokenCreateCommand {
            description: "ci".to_string(),
            expires: expires.to_string(),
            grants: TokenGrants::default(),
        }
    }

    #[test]
    fn test_create_request_encodes_expiration() {
        let mut cmd = create("1h30m");
        cmd.grants.project_roles = vec!["p-1=viewer".to_string()];
        cmd.grants.admin_role = Some("viewer".to_string());
        let rq = cmd.to_request().unwrap();
        assert_eq!(rq.expires, "5400s");
        assert_eq!(rq.project_roles["p-1"], "PROJECT_ROLE_VIEWER");
        assert_eq!(rq.admin_role.as_deref(), Some("ADMIN_ROLE_VIEWER"));
    }

    #[test]
    fn test_create_rejects_unknown_roles() {
        let mut cmd = create("8h");
        cmd.grants.tenant_roles = vec!["acme=superuser".to_string()];
        assert!(cmd.to_request().is_err());

        let mut cmd = create("8h");
        cmd.grants.admin_role = Some("owner".to_string());
        assert!(cmd.to_request().is_err());
    }

    #[test]
    fn test_update_leaves_unset_grants_alone() {
        let cmd = TokenUpdateCommand {
            id: "t-1".to_string(),
            description: Some("renamed".to_string()),
            grants: TokenGrants::default(),
        };
        let rq = cmd.to_request().unwrap();
        assert_eq!(rq.description.as_deref(), Some("renamed"));
        assert!(rq.permissions.is_none());
        assert!(rq.project_roles.is_none());
        assert!(rq.admin_role.is_none());
    }

    #[test]
    fn test_remaining_of_expired_token_is_zero() {
        let token = Token {
            expires: Some(Utc::now() - chrono::Duration::hours(1)),
            ..Default::default()
        };
        assert_eq!(remaining(&token), Duration::ZERO);
    }
}
