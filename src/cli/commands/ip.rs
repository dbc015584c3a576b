//! IP address commands

use crate::cli::genericcli::{
    non_empty, ApplyArgs, CrudResource, DeleteArgs, DescribeArgs, EditArgs, FileArgs,
    GenericCli, SortArgs, SortKeys,
};
use crate::cli::session::Session;
use crate::domain::api::{Ip, IpServiceAllocateRequest, IpServiceUpdateRequest, IpType};
use crate::infrastructure::api::ApiClient;
use crate::shared::error::Result as CliResult;
use async_trait::async_trait;
use clap::{Parser, Subcommand};

pub struct IpResource {
    client: ApiClient,
    project: String,
}

impl IpResource {
    pub fn new(client: ApiClient, project: String) -> Self {
        Self { client, project }
    }

    fn project_of(&self, ip: &Ip) -> String {
        non_empty(&ip.project).unwrap_or_else(|| self.project.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct IpFilter {
    pub name: Option<String>,
    pub network: Option<String>,
    pub ip_type: Option<IpType>,
}

impl IpFilter {
    fn matches(&self, ip: &Ip) -> bool {
        self.name.as_ref().map_or(true, |n| &ip.name == n)
            && self.network.as_ref().map_or(true, |n| &ip.network == n)
            && self.ip_type.map_or(true, |t| ip.ip_type == t)
    }
}

#[async_trait]
impl CrudResource for IpResource {
    type Entity = Ip;
    type Create = IpServiceAllocateRequest;
    type Update = IpServiceUpdateRequest;
    type Filter = IpFilter;

    const KIND: &'static str = "ip";

    async fn list(&self, filter: &IpFilter) -> CliResult<Vec<Ip>> {
        let ips = self.client.ip_list(&self.project).await?;
        Ok(ips.into_iter().filter(|ip| filter.matches(ip)).collect())
    }

    async fn get(&self, id: &str) -> CliResult<Ip> {
        self.client.ip_get(&self.project, id).await
    }

    async fn create(&self, rq: IpServiceAllocateRequest) -> CliResult<Ip> {
        self.client.ip_allocate(&rq).await
    }

    async fn update(&self, rq: IpServiceUpdateRequest) -> CliResult<Ip> {
        self.client.ip_update(&rq).await
    }

    async fn delete(&self, id: &str) -> CliResult<Ip> {
        self.client.ip_delete(&self.project, id).await
    }

    fn id(entity: &Ip) -> Option<String> {
        non_empty(&entity.uuid)
    }

    fn create_request_from(&self, entity: &Ip) -> CliResult<IpServiceAllocateRequest> {
        Ok(IpServiceAllocateRequest {
            project: self.project_of(entity),
            name: entity.name.clone(),
            description: entity.description.clone(),
            tags: entity.tags.clone(),
            is_static: entity.ip_type == IpType::Static,
        })
    }

    fn update_request_from(&self, entity: &Ip) -> CliResult<IpServiceUpdateRequest> {
        let project = self.project_of(entity);
        let mut ip = entity.clone();
        ip.project = project.clone();
        Ok(IpServiceUpdateRequest { project, ip })
    }

    fn sort_keys(&self) -> SortKeys<Ip> {
        SortKeys::new()
            .key("ip", |a: &Ip, b: &Ip| a.ip.cmp(&b.ip))
            .key("id", |a: &Ip, b: &Ip| a.uuid.cmp(&b.uuid))
            .key("name", |a: &Ip, b: &Ip| a.name.cmp(&b.name))
            .key("project", |a: &Ip, b: &Ip| a.project.cmp(&b.project))
            .key("network", |a: &Ip, b: &Ip| a.network.cmp(&b.network))
            .key("type", |a: &Ip, b: &Ip| a.ip_type.cmp(&b.ip_type))
            .key("age", |a: &Ip, b: &Ip| b.created_at.cmp(&a.created_at))
            .defaults(&["ip", "project"])
    }
}

#[derive(Subcommand, Debug)]
pub enum IpCommand {
    /// List IPs of the project
    List(IpListCommand),

    /// Show an IP
    Describe(DescribeArgs),

    /// Allocate an IP from flags or a file
    Create(IpCreateCommand),

    /// Update an IP from flags or a file
    Update(IpUpdateCommand),

    /// Release IPs
    Delete(DeleteArgs),

    /// Allocate or update the IPs of a file
    Apply(ApplyArgs),

    /// Edit an IP in $EDITOR
    Edit(EditArgs),

    /// Turn an ephemeral IP into a static one
    MakeStatic(DescribeArgs),
}

#[derive(Parser, Debug, Clone, Default)]
pub struct IpListCommand {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub network: Option<String>,

    /// ephemeral or static
    #[arg(long = "type")]
    pub ip_type: Option<IpType>,

    #[command(flatten)]
    pub sort: SortArgs,
}

#[derive(Parser, Debug, Clone, Default)]
pub struct IpCreateCommand {
    #[command(flatten)]
    pub file: FileArgs,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Tags as key=value, comma separated
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Keep the IP when the service using it is deleted
    #[arg(long = "static")]
    pub is_static: bool,
}

impl IpCreateCommand {
    pub fn to_request(&self, project: &str) -> IpServiceAllocateRequest {
        IpServiceAllocateRequest {
            project: project.to_string(),
            name: self.name.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
            tags: self.tags.clone(),
            is_static: self.is_static,
        }
    }
}

#[derive(Parser, Debug, Clone, Default)]
pub struct IpUpdateCommand {
    /// IP id
    #[arg(required_unless_present = "file")]
    pub id: Option<String>,

    #[command(flatten)]
    pub file: FileArgs,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Replace the tags, comma separated key=value
    #[arg(long, value_delimiter = ',')]
    pub tags: Option<Vec<String>>,
}

impl IpUpdateCommand {
    pub fn to_request(&self, mut current: Ip) -> IpServiceUpdateRequest {
        if let Some(name) = &self.name {
            current.name = name.clone();
        }
        if let Some(description) = &self.description {
            current.description = description.clone();
        }
        if let Some(tags) = &self.tags {
            current.tags = tags.clone();
        }
        IpServiceUpdateRequest {
            project: current.project.clone(),
            ip: current,
        }
    }
}

impl IpCommand {
    pub async fn execute(&self, session: &Session) -> anyhow::Result<()> {
        let project = session.project()?;
        let cli = GenericCli::new(
            IpResource::new(session.client.clone(), project.clone()),
            &session.printer,
        );

        match self {
            IpCommand::List(cmd) => {
                let filter = IpFilter {
                    name: cmd.name.clone(),
                    network: cmd.network.clone(),
                    ip_type: cmd.ip_type,
                };
                cli.list_and_print(&filter, &cmd.sort).await
            }
            IpCommand::Describe(args) => cli.describe_and_print(&args.id).await,
            IpCommand::Create(cmd) => match &cmd.file.file {
                Some(path) => cli.create_from_file_and_print(path).await,
                None => cli.create_and_print(cmd.to_request(&project)).await,
            },
            IpCommand::Update(cmd) => match (&cmd.file.file, &cmd.id) {
                (Some(path), _) => cli.update_from_file_and_print(path).await,
                (None, Some(id)) => {
                    let current = cli.resource().get(id).await?;
                    cli.update_and_print(cmd.to_request(current)).await
                }
                (None, None) => anyhow::bail!("either an ip id or --file is required"),
            },
            IpCommand::Delete(args) => cli.delete_and_print(args).await,
            IpCommand::Apply(args) => cli.apply_and_print(args).await,
            IpCommand::Edit(args) => cli.edit_and_print(&args.id).await,
            IpCommand::MakeStatic(args) => {
                let mut ip = cli.resource().get(&args.id).await?;
                if ip.ip_type == IpType::Static {
                    anyhow::bail!("ip {} is already static", args.id);
                }
                ip.ip_type = IpType::Static;
                let rq = cli.resource().update_request_from(&ip)?;
                cli.update_and_print(rq).await
            }
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

    fn resource() -> IpResource {
        IpResource::new(ApiClient::with_transport(Arc::new(Unused)), "p-1".to_string())
    }

    #[test]
    fn test_create_request_from_static_entity() {
        let ip = Ip {
            name: "ingress".to_string(),
            ip_type: IpType::Static,
            ..Default::default()
        };
        let rq = resource().create_request_from(&ip).unwrap();
        assert_eq!(rq.project, "p-1");
        assert!(rq.is_static);
    }

    #[test]
    fn test_update_from_flags_keeps_unset_fields() {
        let current = Ip {
            uuid: "ip-1".to_string(),
            project: "p-1".to_string(),
            name: "old".to_string(),
            description: "keep me".to_string(),
            tags: vec!["a=b".to_string()],
            ..Default::default()
        };
        let cmd = IpUpdateCommand {
            id: Some("ip-1".to_string()),
            name: Some("new".to_string()),
            ..Default::default()
        };
        let rq = cmd.to_request(current);
        assert_eq!(rq.project, "p-1");
        assert_eq!(rq.ip.name, "new");
        assert_eq!(rq.ip.description, "keep me");
        assert_eq!(rq.ip.tags, vec!["a=b".to_string()]);
    }

    #[test]
    fn test_filter_by_type() {
        let filter = IpFilter {
            ip_type: Some(IpType::Static),
            ..Default::default()
        };
        assert!(!filter.matches(&Ip::default()));
        assert!(filter.matches(&Ip {
            ip_type: IpType::Static,
            ..Default::default()
        }));
    }
}
