//! Volume and snapshot commands

use crate::cli::genericcli::{
    non_empty, CrudResource, DeleteArgs, DescribeArgs, GenericCli, NotSupported, SortArgs,
    SortKeys,
};
use crate::cli::session::Session;
use crate::domain::api::{Snapshot, StorageListRequest, Volume};
use crate::infrastructure::api::ApiClient;
use crate::infrastructure::constants::DEFAULT_MANIFEST_NAMESPACE;
use crate::infrastructure::kubernetes::ManifestBuilder;
use crate::shared::error::Result as CliResult;
use async_trait::async_trait;
use clap::{Parser, Subcommand};

/// Filters of volume and snapshot listings; name and partition are evaluated by the API
#[derive(Debug, Clone, Default)]
pub struct StorageFilter {
    pub name: Option<String>,
    pub partition: Option<String>,
    pub cluster: Option<String>,
}

impl StorageFilter {
    fn request(&self, project: &str) -> StorageListRequest {
        StorageListRequest {
            project: project.to_string(),
            name: self.name.clone(),
            partition: self.partition.clone(),
        }
    }
}

pub struct VolumeResource {
    client: ApiClient,
    project: String,
}

impl VolumeResource {
    pub fn new(client: ApiClient, project: String) -> Self {
        Self { client, project }
    }
}

#[async_trait]
impl CrudResource for VolumeResource {
    type Entity = Volume;
    type Create = NotSupported;
    type Update = NotSupported;
    type Filter = StorageFilter;

    const KIND: &'static str = "volume";

    async fn list(&self, filter: &StorageFilter) -> CliResult<Vec<Volume>> {
        let volumes = self.client.volume_list(&filter.request(&self.project)).await?;
        Ok(volumes
            .into_iter()
            .filter(|v| filter.cluster.as_ref().map_or(true, |c| &v.cluster_name == c))
            .collect())
    }

    async fn get(&self, id: &str) -> CliResult<Volume> {
        self.client.volume_get(&self.project, id).await
    }

    async fn delete(&self, id: &str) -> CliResult<Volume> {
        self.client.volume_delete(&self.project, id).await
    }

    fn id(entity: &Volume) -> Option<String> {
        non_empty(&entity.uuid)
    }

    fn sort_keys(&self) -> SortKeys<Volume> {
        SortKeys::new()
            .key("name", |a: &Volume, b: &Volume| a.name.cmp(&b.name))
            .key("id", |a: &Volume, b: &Volume| a.uuid.cmp(&b.uuid))
            .key("project", |a: &Volume, b: &Volume| a.project.cmp(&b.project))
            .key("partition", |a: &Volume, b: &Volume| a.partition.cmp(&b.partition))
            .key("cluster", |a: &Volume, b: &Volume| a.cluster_name.cmp(&b.cluster_name))
            .key("size", |a: &Volume, b: &Volume| a.size.cmp(&b.size))
            .key("usage", |a: &Volume, b: &Volume| a.usage.cmp(&b.usage))
            .key("state", |a: &Volume, b: &Volume| a.state.cmp(&b.state))
            .defaults(&["cluster", "name"])
    }
}

pub struct SnapshotResource {
    client: ApiClient,
    project: String,
}

impl SnapshotResource {
    pub fn new(client: ApiClient, project: String) -> Self {
        Self { client, project }
    }
}

#[async_trait]
impl CrudResource for SnapshotResource {
    type Entity = Snapshot;
    type Create = NotSupported;
    type Update = NotSupported;
    type Filter = StorageFilter;

    const KIND: &'static str = "snapshot";

    async fn list(&self, filter: &StorageFilter) -> CliResult<Vec<Snapshot>> {
        self.client.snapshot_list(&filter.request(&self.project)).await
    }

    async fn get(&self, id: &str) -> CliResult<Snapshot> {
        self.client.snapshot_get(&self.project, id).await
    }

    async fn delete(&self, id: &str) -> CliResult<Snapshot> {
        self.client.snapshot_delete(&self.project, id).await
    }

    fn id(entity: &Snapshot) -> Option<String> {
        non_empty(&entity.uuid)
    }

    fn sort_keys(&self) -> SortKeys<Snapshot> {
        SortKeys::new()
            .key("name", |a: &Snapshot, b: &Snapshot| a.name.cmp(&b.name))
            .key("id", |a: &Snapshot, b: &Snapshot| a.uuid.cmp(&b.uuid))
            .key("project", |a: &Snapshot, b: &Snapshot| a.project.cmp(&b.project))
            .key("partition", |a: &Snapshot, b: &Snapshot| a.partition.cmp(&b.partition))
            .key("size", |a: &Snapshot, b: &Snapshot| a.size.cmp(&b.size))
            .key("usage", |a: &Snapshot, b: &Snapshot| a.usage.cmp(&b.usage))
            .key("state", |a: &Snapshot, b: &Snapshot| a.state.cmp(&b.state))
            .key("age", |a: &Snapshot, b: &Snapshot| b.created_at.cmp(&a.created_at))
            .defaults(&["name"])
    }
}

#[derive(Subcommand, Debug)]
pub enum StorageCommand {
    /// Manage volumes
    #[command(subcommand)]
    Volume(VolumeCommand),

    /// Manage snapshots
    #[command(subcommand)]
    Snapshot(SnapshotCommand),
}

#[derive(Subcommand, Debug)]
pub enum VolumeCommand {
    /// List volumes of the project
    List(VolumeListCommand),

    /// Show a volume
    Describe(DescribeArgs),

    /// Delete volumes
    Delete(DeleteArgs),

    /// Print PersistentVolume and PersistentVolumeClaim manifests for a volume
    Manifest(ManifestCommand),
}

#[derive(Subcommand, Debug)]
pub enum SnapshotCommand {
    /// List snapshots of the project
    List(SnapshotListCommand),

    /// Show a snapshot
    Describe(DescribeArgs),

    /// Delete snapshots
    Delete(DeleteArgs),
}

#[derive(Parser, Debug, Clone, Default)]
pub struct VolumeListCommand {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub partition: Option<String>,

    /// Only volumes used by this cluster
    #[arg(long)]
    pub cluster: Option<String>,

    #[command(flatten)]
    pub sort: SortArgs,
}

#[derive(Parser, Debug, Clone, Default)]
pub struct SnapshotListCommand {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub partition: Option<String>,

    #[command(flatten)]
    pub sort: SortArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct ManifestCommand {
    /// Volume id
    pub id: String,

    /// Name of the PersistentVolume and its claim (default: volume name)
    #[arg(long)]
    pub name: Option<String>,

    /// Namespace of the PersistentVolumeClaim
    #[arg(long, short = 'n', default_value = DEFAULT_MANIFEST_NAMESPACE)]
    pub namespace: String,
}

impl StorageCommand {
    pub async fn execute(&self, session: &Session) -> anyhow::Result<()> {
        let project = session.project()?;

        match self {
            StorageCommand::Volume(cmd) => {
                let cli = GenericCli::new(
                    VolumeResource::new(session.client.clone(), project),
                    &session.printer,
                );
                match cmd {
                    VolumeCommand::List(cmd) => {
                        let filter = StorageFilter {
                            name: cmd.name.clone(),
                            partition: cmd.partition.clone(),
                            cluster: cmd.cluster.clone(),
                        };
                        cli.list_and_print(&filter, &cmd.sort).await
                    }
                    VolumeCommand::Describe(args) => cli.describe_and_print(&args.id).await,
                    VolumeCommand::Delete(args) => cli.delete_and_print(args).await,
                    VolumeCommand::Manifest(cmd) => {
                        let volume = cli.resource().get(&cmd.id).await?;
                        let manifest =
                            ManifestBuilder::new(&volume, cmd.name.clone(), cmd.namespace.clone())
                                .render()?;
                        print!("{}", manifest);
                        Ok(())
                    }
                }
            }
            StorageCommand::Snapshot(cmd) => {
                let cli = GenericCli::new(
                    SnapshotResource::new(session.client.clone(), project),
                    &session.printer,
                );
                match cmd {
                    SnapshotCommand::List(cmd) => {
                        let filter = StorageFilter {
                            name: cmd.name.clone(),
                            partition: cmd.partition.clone(),
                            cluster: None,
                        };
                        cli.list_and_print(&filter, &cmd.sort).await
                    }
                    SnapshotCommand::Describe(args) => cli.describe_and_print(&args.id).await,
                    SnapshotCommand::Delete(args) => cli.delete_and_print(args).await,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_request_carries_server_side_filters() {
        let filter = StorageFilter {
            name: Some("data".to_string()),
            partition: None,
            cluster: Some("prod".to_string()),
        };
        let rq = filter.request("p-1");
        assert_eq!(rq.project, "p-1");
        assert_eq!(rq.name.as_deref(), Some("data"));
        assert_eq!(rq.partition, None);
    }
}
