//! Project commands

use crate::cli::genericcli::{
    non_empty, ApplyArgs, CrudResource, DeleteArgs, DescribeArgs, EditArgs, FileArgs,
    GenericCli, SortArgs, SortKeys,
};
use crate::cli::session::Session;
use crate::domain::api::{
    Project, ProjectServiceCreateRequest, ProjectServiceListRequest, ProjectServiceUpdateRequest,
};
use crate::infrastructure::api::ApiClient;
use crate::shared::error::{CliError, Result as CliResult};
use async_trait::async_trait;
use clap::{Parser, Subcommand};

pub struct ProjectResource {
    client: ApiClient,
}

impl ProjectResource {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CrudResource for ProjectResource {
    type Entity = Project;
    type Create = ProjectServiceCreateRequest;
    type Update = ProjectServiceUpdateRequest;
    type Filter = ProjectServiceListRequest;

    const KIND: &'static str = "project";

    async fn list(&self, filter: &ProjectServiceListRequest) -> CliResult<Vec<Project>> {
        self.client.project_list(filter).await
    }

    async fn get(&self, id: &str) -> CliResult<Project> {
        self.client.project_get(id).await
    }

    async fn create(&self, rq: ProjectServiceCreateRequest) -> CliResult<Project> {
        self.client.project_create(&rq).await
    }

    async fn update(&self, rq: ProjectServiceUpdateRequest) -> CliResult<Project> {
        self.client.project_update(&rq).await
    }

    async fn delete(&self, id: &str) -> CliResult<Project> {
        self.client.project_delete(id).await
    }

    fn id(entity: &Project) -> Option<String> {
        non_empty(&entity.uuid)
    }

    fn create_request_from(&self, entity: &Project) -> CliResult<ProjectServiceCreateRequest> {
        if entity.tenant.is_empty() {
            return Err(CliError::invalid_argument(format!(
                "project '{}' has no tenant",
                entity.name
            )));
        }
        Ok(ProjectServiceCreateRequest {
            login: entity.tenant.clone(),
            name: entity.name.clone(),
            description: entity.description.clone(),
        })
    }

    fn update_request_from(&self, entity: &Project) -> CliResult<ProjectServiceUpdateRequest> {
        Ok(ProjectServiceUpdateRequest {
            project: entity.uuid.clone(),
            name: non_empty(&entity.name),
            description: non_empty(&entity.description),
        })
    }

    fn sort_keys(&self) -> SortKeys<Project> {
        SortKeys::new()
            .key("tenant", |a: &Project, b: &Project| a.tenant.cmp(&b.tenant))
            .key("name", |a: &Project, b: &Project| a.name.cmp(&b.name))
            .key("id", |a: &Project, b: &Project| a.uuid.cmp(&b.uuid))
            .key("age", |a: &Project, b: &Project| b.created_at.cmp(&a.created_at))
            .defaults(&["tenant", "name"])
    }
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// List projects
    List(ProjectListCommand),

    /// Show a project
    Describe(DescribeArgs),

    /// Create a project from flags or a file
    Create(ProjectCreateCommand),

    /// Update a project from flags or a file
    Update(ProjectUpdateCommand),

    /// Delete projects
    Delete(DeleteArgs),

    /// Create or update the projects of a file
    Apply(ApplyArgs),

    /// Edit a project in $EDITOR
    Edit(EditArgs),
}

#[derive(Parser, Debug, Clone, Default)]
pub struct ProjectListCommand {
    #[arg(long)]
    pub name: Option<String>,

    /// Login of the owning tenant
    #[arg(long)]
    pub tenant: Option<String>,

    #[command(flatten)]
    pub sort: SortArgs,
}

#[derive(Parser, Debug, Clone, Default)]
pub struct ProjectCreateCommand {
    #[command(flatten)]
    pub file: FileArgs,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Login of the owning tenant
    #[arg(long)]
    pub tenant: Option<String>,
}

impl ProjectCreateCommand {
    pub fn to_request(&self) -> anyhow::Result<ProjectServiceCreateRequest> {
        let (Some(name), Some(login)) = (self.name.clone(), self.tenant.clone()) else {
            anyhow::bail!("--name and --tenant are required when creating a project from flags");
        };
        Ok(ProjectServiceCreateRequest {
            login,
            name,
            description: self.description.clone().unwrap_or_default(),
        })
    }
}

#[derive(Parser, Debug, Clone, Default)]
pub struct ProjectUpdateCommand {
    /// Project id
    #[arg(required_unless_present = "file")]
    pub id: Option<String>,

    #[command(flatten)]
    pub file: FileArgs,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
}

impl ProjectCommand {
    pub async fn execute(&self, session: &Session) -> anyhow::Result<()> {
        let cli = GenericCli::new(ProjectResource::new(session.client.clone()), &session.printer);

        match self {
            ProjectCommand::List(cmd) => {
                let filter = ProjectServiceListRequest {
                    name: cmd.name.clone(),
                    tenant: cmd.tenant.clone(),
                };
                cli.list_and_print(&filter, &cmd.sort).await
            }
            ProjectCommand::Describe(args) => cli.describe_and_print(&args.id).await,
            ProjectCommand::Create(cmd) => match &cmd.file.file {
                Some(path) => cli.create_from_file_and_print(path).await,
                None => cli.create_and_print(cmd.to_request()?).await,
            },
            ProjectCommand::Update(cmd) => match (&cmd.file.file, &cmd.id) {
                (Some(path), _) => cli.update_from_file_and_print(path).await,
                (None, Some(id)) => {
                    let rq = ProjectServiceUpdateRequest {
                        project: id.clone(),
                        name: cmd.name.clone(),
                        description: cmd.description.clone(),
                    };
                    cli.update_and_print(rq).await
                }
                (None, None) => anyhow::bail!("either a project id or --file is required"),
            },
            ProjectCommand::Delete(args) => cli.delete_and_print(args).await,
            ProjectCommand::Apply(args) => cli.apply_and_print(args).await,
            ProjectCommand::Edit(args) => cli.edit_and_print(&args.id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_from_flags() {
        let cmd = ProjectCreateCommand {
            name: Some("web".to_string()),
            tenant: Some("acme@github".to_string()),
            ..Default::default()
        };
        let rq = cmd.to_request().unwrap();
        assert_eq!(rq.login, "acme@github");
        assert_eq!(rq.name, "web");
        assert_eq!(rq.description, "");
    }

    #[test]
    fn test_create_without_tenant_fails() {
        let cmd = ProjectCreateCommand {
            name: Some("web".to_string()),
            ..Default::default()
        };
        assert!(cmd.to_request().is_err());
    }
}
