//! Kubernetes cluster commands

use crate::cli::genericcli::{
    non_empty, ApplyArgs, CrudResource, DeleteArgs, DescribeArgs, EditArgs, FileArgs,
    GenericCli, SortArgs, SortKeys,
};
use crate::cli::session::Session;
use crate::domain::api::{
    Cluster, ClusterServiceCreateRequest, ClusterServiceUpdateRequest, KubernetesSpec,
    Maintenance, Worker, WorkerUpdate,
};
use crate::infrastructure::api::ApiClient;
use crate::infrastructure::constants::DEFAULT_KUBECONFIG_EXPIRATION;
use crate::infrastructure::kubernetes::kubeconfig;
use crate::shared::duration::{parse_duration, to_proto_duration};
use crate::shared::error::{CliError, Result as CliResult};
use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const DEFAULT_WORKER_NAME: &str = "group-0";

pub struct ClusterResource {
    client: ApiClient,
    project: String,
}

impl ClusterResource {
    pub fn new(client: ApiClient, project: String) -> Self {
        Self { client, project }
    }
}

/// Client-side filters of `cluster list`
#[derive(Debug, Clone, Default)]
pub struct ClusterFilter {
    pub name: Option<String>,
    pub partition: Option<String>,
}

impl ClusterFilter {
    fn matches(&self, cluster: &Cluster) -> bool {
        self.name.as_ref().map_or(true, |n| &cluster.name == n)
            && self.partition.as_ref().map_or(true, |p| &cluster.partition == p)
    }
}

#[async_trait]
impl CrudResource for ClusterResource {
    type Entity = Cluster;
    type Create = ClusterServiceCreateRequest;
    type Update = ClusterServiceUpdateRequest;
    type Filter = ClusterFilter;

    const KIND: &'static str = "cluster";

    async fn list(&self, filter: &ClusterFilter) -> CliResult<Vec<Cluster>> {
        let clusters = self.client.cluster_list(&self.project).await?;
        Ok(clusters.into_iter().filter(|c| filter.matches(c)).collect())
    }

    async fn get(&self, id: &str) -> CliResult<Cluster> {
        self.client.cluster_get(&self.project, id).await
    }

    async fn create(&self, rq: ClusterServiceCreateRequest) -> CliResult<Cluster> {
        self.client.cluster_create(&rq).await
    }

    async fn update(&self, rq: ClusterServiceUpdateRequest) -> CliResult<Cluster> {
        self.client.cluster_update(&rq).await
    }

    async fn delete(&self, id: &str) -> CliResult<Cluster> {
        self.client.cluster_delete(&self.project, id).await
    }

    fn id(entity: &Cluster) -> Option<String> {
        non_empty(&entity.uuid)
    }

    fn create_request_from(&self, entity: &Cluster) -> CliResult<ClusterServiceCreateRequest> {
        Ok(ClusterServiceCreateRequest {
            project: non_empty(&entity.project).unwrap_or_else(|| self.project.clone()),
            name: entity.name.clone(),
            partition: entity.partition.clone(),
            kubernetes: entity.kubernetes.clone(),
            workers: entity.workers.clone(),
            maintenance: entity.maintenance.clone(),
        })
    }

    fn update_request_from(&self, entity: &Cluster) -> CliResult<ClusterServiceUpdateRequest> {
        Ok(ClusterServiceUpdateRequest {
            uuid: entity.uuid.clone(),
            project: non_empty(&entity.project).unwrap_or_else(|| self.project.clone()),
            kubernetes: Some(entity.kubernetes.clone()),
            workers: Some(entity.workers.iter().map(WorkerUpdate::from).collect()),
            maintenance: Some(entity.maintenance.clone()),
        })
    }

    fn sort_keys(&self) -> SortKeys<Cluster> {
        SortKeys::new()
            .key("tenant", |a: &Cluster, b: &Cluster| a.tenant.cmp(&b.tenant))
            .key("project", |a: &Cluster, b: &Cluster| a.project.cmp(&b.project))
            .key("name", |a: &Cluster, b: &Cluster| a.name.cmp(&b.name))
            .key("partition", |a: &Cluster, b: &Cluster| a.partition.cmp(&b.partition))
            .key("id", |a: &Cluster, b: &Cluster| a.uuid.cmp(&b.uuid))
            .key("version", |a: &Cluster, b: &Cluster| {
                a.kubernetes.version.cmp(&b.kubernetes.version)
            })
            .key("age", |a: &Cluster, b: &Cluster| b.created_at.cmp(&a.created_at))
            .defaults(&["tenant", "project", "name"])
    }
}

#[derive(Subcommand, Debug)]
pub enum ClusterCommand {
    /// List clusters of the project
    List(ClusterListCommand),

    /// Show a cluster
    Describe(DescribeArgs),

    /// Create a cluster from flags or a file
    Create(ClusterCreateCommand),

    /// Update a cluster from flags or a file
    Update(ClusterUpdateCommand),

    /// Delete clusters
    Delete(DeleteArgs),

    /// Create or update the clusters of a file
    Apply(ApplyArgs),

    /// Edit a cluster in $EDITOR
    Edit(EditArgs),

    /// Fetch cluster credentials, optionally merging them into a kubeconfig
    Kubeconfig(KubeconfigCommand),

    /// Trigger a reconciliation of the cluster
    Reconcile(DescribeArgs),

    /// Show access to the cluster's monitoring dashboards
    Monitoring(DescribeArgs),
}

#[derive(Parser, Debug, Clone, Default)]
pub struct ClusterListCommand {
    /// Only clusters with this name
    #[arg(long)]
    pub name: Option<String>,

    /// Only clusters in this partition
    #[arg(long)]
    pub partition: Option<String>,

    #[command(flatten)]
    pub sort: SortArgs,
}

/// Flags of the worker group being created or changed
#[derive(Args, Debug, Clone, Default)]
pub struct WorkerArgs {
    /// Worker group name
    #[arg(long)]
    pub worker_name: Option<String>,

    #[arg(long)]
    pub machine_type: Option<String>,

    /// Minimum number of nodes
    #[arg(long)]
    pub minsize: Option<u32>,

    /// Maximum number of nodes
    #[arg(long)]
    pub maxsize: Option<u32>,

    /// Nodes added above maxsize during rolling updates
    #[arg(long)]
    pub maxsurge: Option<u32>,

    /// Nodes allowed to be unavailable during rolling updates
    #[arg(long)]
    pub maxunavailable: Option<u32>,
}

impl WorkerArgs {
    fn is_set(&self) -> bool {
        self.worker_name.is_some()
            || self.machine_type.is_some()
            || self.minsize.is_some()
            || self.maxsize.is_some()
            || self.maxsurge.is_some()
            || self.maxunavailable.is_some()
    }

    fn to_worker(&self) -> Worker {
        Worker {
            name: self
                .worker_name
                .clone()
                .unwrap_or_else(|| DEFAULT_WORKER_NAME.to_string()),
            machine_type: self.machine_type.clone().unwrap_or_default(),
            minsize: self.minsize.unwrap_or(1),
            maxsize: self.maxsize.unwrap_or(3),
            maxsurge: self.maxsurge.unwrap_or(1),
            maxunavailable: self.maxunavailable.unwrap_or(0),
        }
    }

    /// Merge the flags into the worker groups of an existing cluster.
    ///
    /// Without `--worker-name` a cluster with a single group changes that group.
    fn apply(&self, current: &[Worker]) -> CliResult<Vec<WorkerUpdate>> {
        let target = match (&self.worker_name, current) {
            (Some(name), _) => name.clone(),
            (None, []) => DEFAULT_WORKER_NAME.to_string(),
            (None, [only]) => only.name.clone(),
            (None, groups) => {
                let names: Vec<&str> = groups.iter().map(|w| w.name.as_str()).collect();
                return Err(CliError::invalid_argument(format!(
                    "cluster has several worker groups ({}), --worker-name is required",
                    names.join(", ")
                )));
            }
        };

        let mut workers: Vec<WorkerUpdate> = current.iter().map(WorkerUpdate::from).collect();
        let index = match workers.iter().position(|w| w.name == target) {
            Some(index) => index,
            None => {
                workers.push(WorkerUpdate {
                    name: target,
                    ..Default::default()
                });
                workers.len() - 1
            }
        };

        let worker = &mut workers[index];
        if let Some(machine_type) = &self.machine_type {
            worker.machine_type = Some(machine_type.clone());
        }
        if self.minsize.is_some() {
            worker.minsize = self.minsize;
        }
        if self.maxsize.is_some() {
            worker.maxsize = self.maxsize;
        }
        if self.maxsurge.is_some() {
            worker.maxsurge = self.maxsurge;
        }
        if self.maxunavailable.is_some() {
            worker.maxunavailable = self.maxunavailable;
        }
        Ok(workers)
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct MaintenanceArgs {
    /// Update the Kubernetes patch version automatically
    #[arg(long)]
    pub autoupdate_kubernetes: Option<bool>,

    /// Update the worker machine images automatically
    #[arg(long)]
    pub autoupdate_machine_images: Option<bool>,

    /// Begin of the maintenance window, e.g. "05:00 AM"
    #[arg(long)]
    pub maintenance_begin: Option<String>,

    /// Length of the maintenance window, e.g. "2h"
    #[arg(long)]
    pub maintenance_duration: Option<String>,
}

impl MaintenanceArgs {
    fn is_set(&self) -> bool {
        self.autoupdate_kubernetes.is_some()
            || self.autoupdate_machine_images.is_some()
            || self.maintenance_begin.is_some()
            || self.maintenance_duration.is_some()
    }

    fn apply(&self, maintenance: &mut Maintenance) -> CliResult<()> {
        if self.autoupdate_kubernetes.is_some() {
            maintenance.kubernetes_autoupdate = self.autoupdate_kubernetes;
        }
        if self.autoupdate_machine_images.is_some() {
            maintenance.machineimage_autoupdate = self.autoupdate_machine_images;
        }
        if self.maintenance_begin.is_some() || self.maintenance_duration.is_some() {
            let window = maintenance.time_window.get_or_insert_with(Default::default);
            if let Some(begin) = &self.maintenance_begin {
                window.begin = begin.clone();
            }
            if let Some(duration) = &self.maintenance_duration {
                window.duration = to_proto_duration(parse_duration(duration)?);
            }
        }
        Ok(())
    }
}

#[derive(Parser, Debug, Clone, Default)]
pub struct ClusterCreateCommand {
    #[command(flatten)]
    pub file: FileArgs,

    #[arg(long, required_unless_present = "file")]
    pub name: Option<String>,

    #[arg(long, required_unless_present = "file")]
    pub partition: Option<String>,

    #[arg(long)]
    pub kubernetes_version: Option<String>,

    #[command(flatten)]
    pub worker: WorkerArgs,

    #[command(flatten)]
    pub maintenance: MaintenanceArgs,
}

impl ClusterCreateCommand {
    pub fn to_request(&self, project: &str) -> CliResult<ClusterServiceCreateRequest> {
        let mut maintenance = Maintenance::default();
        self.maintenance.apply(&mut maintenance)?;

        Ok(ClusterServiceCreateRequest {
            project: project.to_string(),
            name: self.name.clone().unwrap_or_default(),
            partition: self.partition.clone().unwrap_or_default(),
            kubernetes: KubernetesSpec {
                version: self.kubernetes_version.clone().unwrap_or_default(),
            },
            workers: vec![self.worker.to_worker()],
            maintenance,
        })
    }
}

#[derive(Parser, Debug, Clone, Default)]
pub struct ClusterUpdateCommand {
    /// Cluster id
    #[arg(required_unless_present = "file")]
    pub id: Option<String>,

    #[command(flatten)]
    pub file: FileArgs,

    #[arg(long)]
    pub kubernetes_version: Option<String>,

    #[command(flatten)]
    pub worker: WorkerArgs,

    #[command(flatten)]
    pub maintenance: MaintenanceArgs,
}

impl ClusterUpdateCommand {
    /// Update request changing only what was given on the command line.
    pub fn to_request(&self, current: &Cluster) -> CliResult<ClusterServiceUpdateRequest> {
        let maintenance = if self.maintenance.is_set() {
            let mut maintenance = current.maintenance.clone();
            self.maintenance.apply(&mut maintenance)?;
            Some(maintenance)
        } else {
            None
        };
        let workers = if self.worker.is_set() {
            Some(self.worker.apply(&current.workers)?)
        } else {
            None
        };

        Ok(ClusterServiceUpdateRequest {
            uuid: current.uuid.clone(),
            project: current.project.clone(),
            kubernetes: self
                .kubernetes_version
                .clone()
                .map(|version| KubernetesSpec { version }),
            workers,
            maintenance,
        })
    }
}

#[derive(Parser, Debug, Clone)]
pub struct KubeconfigCommand {
    /// Cluster id
    pub id: String,

    /// Lifetime of the credentials, e.g. "8h" or "1d"
    #[arg(long, default_value = DEFAULT_KUBECONFIG_EXPIRATION)]
    pub expiration: String,

    /// Merge into a kubeconfig file instead of printing
    #[arg(long)]
    pub merge: bool,

    /// Kubeconfig to merge into (default: $KUBECONFIG or ~/.kube/config)
    #[arg(long, value_name = "PATH")]
    pub kubeconfig: Option<PathBuf>,

    /// Keep the current kubeconfig context when merging
    #[arg(long)]
    pub no_activate: bool,
}

impl ClusterCommand {
    pub async fn execute(&self, session: &Session) -> anyhow::Result<()> {
        let project = session.project()?;
        let resource = ClusterResource::new(session.client.clone(), project.clone());
        let cli = GenericCli::new(resource, &session.printer);

        match self {
            ClusterCommand::List(cmd) => {
                let filter = ClusterFilter {
                    name: cmd.name.clone(),
                    partition: cmd.partition.clone(),
                };
                cli.list_and_print(&filter, &cmd.sort).await
            }
            ClusterCommand::Describe(args) => cli.describe_and_print(&args.id).await,
            ClusterCommand::Create(cmd) => match &cmd.file.file {
                Some(path) => cli.create_from_file_and_print(path).await,
                None => cli.create_and_print(cmd.to_request(&project)?).await,
            },
            ClusterCommand::Update(cmd) => match (&cmd.file.file, &cmd.id) {
                (Some(path), _) => cli.update_from_file_and_print(path).await,
                (None, Some(id)) => {
                    let current = cli.resource().get(id).await?;
                    cli.update_and_print(cmd.to_request(&current)?).await
                }
                (None, None) => anyhow::bail!("either a cluster id or --file is required"),
            },
            ClusterCommand::Delete(args) => cli.delete_and_print(args).await,
            ClusterCommand::Apply(args) => cli.apply_and_print(args).await,
            ClusterCommand::Edit(args) => cli.edit_and_print(&args.id).await,
            ClusterCommand::Kubeconfig(cmd) => cmd.execute(session, &project).await,
            ClusterCommand::Reconcile(args) => {
                let cluster = session.client.cluster_reconcile(&project, &args.id).await?;
                session.printer.print_describe(&cluster)?;
                Ok(())
            }
            ClusterCommand::Monitoring(args) => {
                let monitoring = session.client.cluster_monitoring(&project, &args.id).await?;
                session.printer.print_describe(&monitoring)?;
                Ok(())
            }
        }
    }
}

impl KubeconfigCommand {
    pub async fn execute(&self, session: &Session, project: &str) -> anyhow::Result<()> {
        let expiration = parse_duration(&self.expiration)?;
        let credentials = session
            .client
            .cluster_credentials(project, &self.id, expiration)
            .await?;

        if !self.merge {
            print!("{}", credentials);
            return Ok(());
        }

        let cluster = session.client.cluster_get(project, &self.id).await?;
        let path = kubeconfig::resolve_kubeconfig_path(self.kubeconfig.as_deref())?;
        let context = kubeconfig::context_name(project, &cluster.name);
        kubeconfig::merge_into_file(&path, &credentials, &context, !self.no_activate)?;

        println!("merged context \"{}\" into {}", context, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api::MaintenanceTimeWindow;

    fn cluster() -> Cluster {
        Cluster {
            uuid: "c-1".to_string(),
            project: "p-1".to_string(),
            name: "prod".to_string(),
            workers: vec![Worker {
                name: "group-0".to_string(),
                machine_type: "n1-medium".to_string(),
                minsize: 1,
                maxsize: 3,
                maxsurge: 1,
                maxunavailable: 0,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_create_request_from_flags() {
        let cmd = ClusterCreateCommand {
            name: Some("prod".to_string()),
            partition: Some("eqx-mu4".to_string()),
            kubernetes_version: Some("1.30.2".to_string()),
            worker: WorkerArgs {
                machine_type: Some("n1-medium".to_string()),
                maxsize: Some(5),
                ..Default::default()
            },
            maintenance: MaintenanceArgs {
                maintenance_begin: Some("05:00 AM".to_string()),
                maintenance_duration: Some("2h".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let rq = cmd.to_request("p-1").unwrap();
        assert_eq!(rq.project, "p-1");
        assert_eq!(rq.workers[0].name, "group-0");
        assert_eq!(rq.workers[0].minsize, 1);
        assert_eq!(rq.workers[0].maxsize, 5);
        assert_eq!(
            rq.maintenance.time_window,
            Some(MaintenanceTimeWindow {
                begin: "05:00 AM".to_string(),
                duration: "7200s".to_string(),
            })
        );
    }

    #[test]
    fn test_update_only_touches_given_fields() {
        let cmd = ClusterUpdateCommand {
            id: Some("c-1".to_string()),
            kubernetes_version: Some("1.31.0".to_string()),
            ..Default::default()
        };
        let rq = cmd.to_request(&cluster()).unwrap();
        assert_eq!(rq.kubernetes.unwrap().version, "1.31.0");
        assert!(rq.workers.is_none());
        assert!(rq.maintenance.is_none());
    }

    #[test]
    fn test_update_single_worker_group() {
        let cmd = ClusterUpdateCommand {
            id: Some("c-1".to_string()),
            worker: WorkerArgs {
                maxsize: Some(6),
                ..Default::default()
            },
            ..Default::default()
        };
        let workers = cmd.to_request(&cluster()).unwrap().workers.unwrap();
        assert_eq!(workers.len(), 1);
        assert_eq!(workers[0].maxsize, Some(6));
        assert_eq!(workers[0].minsize, Some(1));
    }

    #[test]
    fn test_update_requires_worker_name_with_several_groups() {
        let mut current = cluster();
        current.workers[0].name = "blue".to_string();
        let mut green = current.workers[0].clone();
        green.name = "green".to_string();
        current.workers.push(green);

        let cmd = ClusterUpdateCommand {
            id: Some("c-1".to_string()),
            worker: WorkerArgs {
                maxsize: Some(9),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = cmd.to_request(&current).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument(_)));
        assert!(err.to_string().contains("blue, green"));

        let cmd = ClusterUpdateCommand {
            worker: WorkerArgs {
                worker_name: Some("green".to_string()),
                maxsize: Some(9),
                ..Default::default()
            },
            ..cmd
        };
        let workers = cmd.to_request(&current).unwrap().workers.unwrap();
        assert_eq!(workers.len(), 2);
        assert_eq!(workers[0].maxsize, Some(3));
        assert_eq!(workers[1].maxsize, Some(9));
    }

    #[test]
    fn test_update_adds_new_worker_group() {
        let cmd = ClusterUpdateCommand {
            id: Some("c-1".to_string()),
            worker: WorkerArgs {
                worker_name: Some("gpu".to_string()),
                machine_type: Some("g1-large".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let workers = cmd.to_request(&cluster()).unwrap().workers.unwrap();
        assert_eq!(workers.len(), 2);
        assert_eq!(workers[1].name, "gpu");
        assert_eq!(workers[1].machine_type.as_deref(), Some("g1-large"));
        assert_eq!(workers[1].maxsize, None);
    }

    #[test]
    fn test_filter() {
        let filter = ClusterFilter {
            partition: Some("eqx-mu4".to_string()),
            ..Default::default()
        };
        let mut c = cluster();
        assert!(!filter.matches(&c));
        c.partition = "eqx-mu4".to_string();
        assert!(filter.matches(&c));
    }
}
