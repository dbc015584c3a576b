//! Tenant commands

use crate::cli::genericcli::{
    non_empty, ApplyArgs, CrudResource, DeleteArgs, DescribeArgs, EditArgs, FileArgs,
    GenericCli, SortArgs, SortKeys,
};
use crate::cli::session::Session;
use crate::domain::api::{
    Tenant, TenantServiceCreateRequest, TenantServiceListRequest, TenantServiceUpdateRequest,
};
use crate::infrastructure::api::ApiClient;
use crate::shared::error::Result as CliResult;
use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};

pub struct TenantResource {
    client: ApiClient,
}

impl TenantResource {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CrudResource for TenantResource {
    type Entity = Tenant;
    type Create = TenantServiceCreateRequest;
    type Update = TenantServiceUpdateRequest;
    type Filter = TenantServiceListRequest;

    const KIND: &'static str = "tenant";

    async fn list(&self, filter: &TenantServiceListRequest) -> CliResult<Vec<Tenant>> {
        self.client.tenant_list(filter).await
    }

    async fn get(&self, id: &str) -> CliResult<Tenant> {
        self.client.tenant_get(id).await
    }

    async fn create(&self, rq: TenantServiceCreateRequest) -> CliResult<Tenant> {
        self.client.tenant_create(&rq).await
    }

    async fn update(&self, rq: TenantServiceUpdateRequest) -> CliResult<Tenant> {
        self.client.tenant_update(&rq).await
    }

    async fn delete(&self, id: &str) -> CliResult<Tenant> {
        self.client.tenant_delete(id).await
    }

    fn id(entity: &Tenant) -> Option<String> {
        non_empty(&entity.login)
    }

    fn create_request_from(&self, entity: &Tenant) -> CliResult<TenantServiceCreateRequest> {
        Ok(TenantServiceCreateRequest {
            name: entity.name.clone(),
            email: non_empty(&entity.email),
            description: non_empty(&entity.description),
            avatar_url: non_empty(&entity.avatar_url),
            phone_number: non_empty(&entity.phone_number),
        })
    }

    fn update_request_from(&self, entity: &Tenant) -> CliResult<TenantServiceUpdateRequest> {
        Ok(TenantServiceUpdateRequest {
            login: entity.login.clone(),
            name: non_empty(&entity.name),
            email: non_empty(&entity.email),
            description: non_empty(&entity.description),
            avatar_url: non_empty(&entity.avatar_url),
            phone_number: non_empty(&entity.phone_number),
        })
    }

    fn sort_keys(&self) -> SortKeys<Tenant> {
        SortKeys::new()
            .key("login", |a: &Tenant, b: &Tenant| a.login.cmp(&b.login))
            .key("name", |a: &Tenant, b: &Tenant| a.name.cmp(&b.name))
            .key("email", |a: &Tenant, b: &Tenant| a.email.cmp(&b.email))
            .key("provider", |a: &Tenant, b: &Tenant| a.oauth_provider.cmp(&b.oauth_provider))
            .key("age", |a: &Tenant, b: &Tenant| b.created_at.cmp(&a.created_at))
            .defaults(&["login"])
    }
}

#[derive(Subcommand, Debug)]
pub enum TenantCommand {
    /// List tenants
    List(TenantListCommand),

    /// Show a tenant
    Describe(DescribeArgs),

    /// Create a tenant from flags or a file
    Create(TenantCreateCommand),

    /// Update a tenant from flags or a file
    Update(TenantUpdateCommand),

    /// Delete tenants
    Delete(DeleteArgs),

    /// Create or update the tenants of a file
    Apply(ApplyArgs),

    /// Edit a tenant in $EDITOR
    Edit(EditArgs),
}

#[derive(Parser, Debug, Clone, Default)]
pub struct TenantListCommand {
    #[arg(long)]
    pub name: Option<String>,

    #[command(flatten)]
    pub sort: SortArgs,
}

/// Flags shared by tenant create and update
#[derive(Args, Debug, Clone, Default)]
pub struct TenantFields {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub avatar_url: Option<String>,

    #[arg(long = "phone")]
    pub phone_number: Option<String>,
}

#[derive(Parser, Debug, Clone, Default)]
pub struct TenantCreateCommand {
    #[command(flatten)]
    pub file: FileArgs,

    #[command(flatten)]
    pub fields: TenantFields,
}

impl TenantCreateCommand {
    pub fn to_request(&self) -> anyhow::Result<TenantServiceCreateRequest> {
        let f = &self.fields;
        let Some(name) = f.name.clone() else {
            anyhow::bail!("--name is required when creating a tenant from flags");
        };
        Ok(TenantServiceCreateRequest {
            name,
            email: f.email.clone(),
            description: f.description.clone(),
            avatar_url: f.avatar_url.clone(),
            phone_number: f.phone_number.clone(),
        })
    }
}

#[derive(Parser, Debug, Clone, Default)]
pub struct TenantUpdateCommand {
    /// Tenant login
    #[arg(required_unless_present = "file")]
    pub login: Option<String>,

    #[command(flatten)]
    pub file: FileArgs,

    #[command(flatten)]
    pub fields: TenantFields,
}

impl TenantUpdateCommand {
    pub fn to_request(&self, login: &str) -> TenantServiceUpdateRequest {
        let f = &self.fields;
        TenantServiceUpdateRequest {
            login: login.to_string(),
            name: f.name.clone(),
            email: f.email.clone(),
            description: f.description.clone(),
            avatar_url: f.avatar_url.clone(),
            phone_number: f.phone_number.clone(),
        }
    }
}

impl TenantCommand {
    pub async fn execute(&self, session: &Session) -> anyhow::Result<()> {
        let cli = GenericCli::new(TenantResource::new(session.client.clone()), &session.printer);

        match self {
            TenantCommand::List(cmd) => {
                let filter = TenantServiceListRequest {
                    name: cmd.name.clone(),
                };
                cli.list_and_print(&filter, &cmd.sort).await
            }
            TenantCommand::Describe(args) => cli.describe_and_print(&args.id).await,
            TenantCommand::Create(cmd) => match &cmd.file.file {
                Some(path) => cli.create_from_file_and_print(path).await,
                None => cli.create_and_print(cmd.to_request()?).await,
            },
            TenantCommand::Update(cmd) => match (&cmd.file.file, &cmd.login) {
                (Some(path), _) => cli.update_from_file_and_print(path).await,
                (None, Some(login)) => cli.update_and_print(cmd.to_request(login)).await,
                (None, None) => anyhow::bail!("either a tenant login or --file is required"),
            },
            TenantCommand::Delete(args) => cli.delete_and_print(args).await,
            TenantCommand::Apply(args) => cli.apply_and_print(args).await,
            TenantCommand::Edit(args) => cli.edit_and_print(&args.id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::api::Transport;
    use serde_json::Value;
    use std::sync::Arc;

    struct Unused;

    #[async_trait]
    impl Transport for Unused {
        async fn unary(&self, procedure: &str, _request: Value) -> CliResult<Value> {
            panic!("unexpected call to {}", procedure)
        }
    }

    #[test]
    fn test_create_requires_name() {
        assert!(TenantCreateCommand::default().to_request().is_err());
    }

    #[test]
    fn test_update_request_from_drops_empty_fields() {
        let resource = TenantResource::new(ApiClient::with_transport(Arc::new(Unused)));
        let tenant = Tenant {
            login: "acme@github".to_string(),
            name: "Acme".to_string(),
            ..Default::default()
        };
        let rq = resource.update_request_from(&tenant).unwrap();
        assert_eq!(rq.login, "acme@github");
        assert_eq!(rq.name.as_deref(), Some("Acme"));
        assert_eq!(rq.email, None);
    }
}
