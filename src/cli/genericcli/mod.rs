//! Uniform list/describe/create/update/delete/apply/edit commands over typed resources

pub mod file;
pub mod sorter;

pub use sorter::SortKeys;

use crate::cli::display::{Printer, TableRow};
use crate::shared::error::{CliError, Result as CliResult};
use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Args;
use futures::future::try_join_all;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// `Some(value)` unless it is empty, for identities of not yet created entities.
pub fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Request type of an operation a resource does not offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotSupported {}

/// A remote resource with typed CRUD callbacks.
///
/// Operations a resource does not offer keep the default implementation, which
/// fails with [`CliError::NotSupported`].
#[async_trait]
pub trait CrudResource: Send + Sync {
    type Entity: Serialize + DeserializeOwned + TableRow + Clone + Send + Sync;
    type Create: Send + Sync;
    type Update: Send + Sync;
    type Filter: Send + Sync;

    /// Singular name used in messages, e.g. `cluster`
    const KIND: &'static str;

    async fn list(&self, filter: &Self::Filter) -> CliResult<Vec<Self::Entity>>;

    async fn get(&self, id: &str) -> CliResult<Self::Entity>;

    async fn create(&self, _rq: Self::Create) -> CliResult<Self::Entity> {
        Err(CliError::not_supported(Self::KIND, "create"))
    }

    async fn update(&self, _rq: Self::Update) -> CliResult<Self::Entity> {
        Err(CliError::not_supported(Self::KIND, "update"))
    }

    async fn delete(&self, _id: &str) -> CliResult<Self::Entity> {
        Err(CliError::not_supported(Self::KIND, "delete"))
    }

    /// Identity of an entity, `None` when it has not been assigned yet.
    fn id(entity: &Self::Entity) -> Option<String>;

    fn create_request_from(&self, _entity: &Self::Entity) -> CliResult<Self::Create> {
        Err(CliError::not_supported(Self::KIND, "create from file"))
    }

    fn update_request_from(&self, _entity: &Self::Entity) -> CliResult<Self::Update> {
        Err(CliError::not_supported(Self::KIND, "update from file"))
    }

    fn sort_keys(&self) -> SortKeys<Self::Entity>;
}

/// `--sort-by` flag of list commands
#[derive(Args, Debug, Clone, Default)]
pub struct SortArgs {
    /// Sort keys, comma separated; prefix a key with `-` to reverse it
    #[arg(long = "sort-by", value_name = "KEYS")]
    pub sort_by: Vec<String>,
}

/// `-f` flag of create and update commands
#[derive(Args, Debug, Clone, Default)]
pub struct FileArgs {
    /// YAML file with one or more entities (`-` for stdin)
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct DescribeArgs {
    pub id: String,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DeleteArgs {
    /// Identifiers of the entities to delete
    #[arg(required_unless_present = "file")]
    pub ids: Vec<String>,

    /// Delete the entities listed in a YAML file
    #[arg(short = 'f', long = "file", value_name = "PATH", conflicts_with = "ids")]
    pub file: Option<PathBuf>,

    /// Do not ask for confirmation
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ApplyArgs {
    /// YAML file with one or more entities (`-` for stdin)
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    pub id: String,
}

/// Drives a [`CrudResource`] and prints the results.
pub struct GenericCli<'a, R> {
    resource: R,
    printer: &'a Printer,
}

impl<'a, R: CrudResource> GenericCli<'a, R> {
    pub fn new(resource: R, printer: &'a Printer) -> Self {
        Self { resource, printer }
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    pub fn printer(&self) -> &Printer {
        self.printer
    }

    pub async fn list(&self, filter: &R::Filter, sort_by: &[String]) -> Result<Vec<R::Entity>> {
        let mut items = self
            .resource
            .list(filter)
            .await
            .with_context(|| format!("failed to list {}s", R::KIND))?;
        self.resource.sort_keys().sort(&mut items, sort_by)?;
        Ok(items)
    }

    pub async fn list_and_print(&self, filter: &R::Filter, sort: &SortArgs) -> Result<()> {
        let items = self.list(filter, &sort.sort_by).await?;
        self.printer.print_list(&items)?;
        Ok(())
    }

    pub async fn describe_and_print(&self, id: &str) -> Result<()> {
        let entity = self
            .resource
            .get(id)
            .await
            .with_context(|| format!("failed to get {} {}", R::KIND, id))?;
        self.printer.print_describe(&entity)?;
        Ok(())
    }

    pub async fn create_and_print(&self, rq: R::Create) -> Result<()> {
        let entity = self
            .resource
            .create(rq)
            .await
            .with_context(|| format!("failed to create {}", R::KIND))?;
        self.printer.print_describe(&entity)?;
        Ok(())
    }

    pub async fn update_and_print(&self, rq: R::Update) -> Result<()> {
        let entity = self
            .resource
            .update(rq)
            .await
            .with_context(|| format!("failed to update {}", R::KIND))?;
        self.printer.print_describe(&entity)?;
        Ok(())
    }

    /// Create every entity of the file, in file order.
    pub async fn create_from_file(&self, path: &Path) -> Result<Vec<R::Entity>> {
        let mut created = Vec::new();
        for entity in self.read_file(path)? {
            let rq = self.resource.create_request_from(&entity)?;
            let result = self
                .resource
                .create(rq)
                .await
                .with_context(|| format!("failed to create {} from {}", R::KIND, path.display()))?;
            created.push(result);
        }
        Ok(created)
    }

    pub async fn update_from_file(&self, path: &Path) -> Result<Vec<R::Entity>> {
        let mut updated = Vec::new();
        for entity in self.read_file(path)? {
            let rq = self.resource.update_request_from(&entity)?;
            let result = self
                .resource
                .update(rq)
                .await
                .with_context(|| format!("failed to update {} from {}", R::KIND, path.display()))?;
            updated.push(result);
        }
        Ok(updated)
    }

    pub async fn create_from_file_and_print(&self, path: &Path) -> Result<()> {
        let created = self.create_from_file(path).await?;
        self.print_results(&created)
    }

    pub async fn update_from_file_and_print(&self, path: &Path) -> Result<()> {
        let updated = self.update_from_file(path).await?;
        self.print_results(&updated)
    }

    /// Create entities that do not exist yet and update the others.
    pub async fn apply(&self, path: &Path) -> Result<Vec<R::Entity>> {
        let mut applied = Vec::new();
        for entity in self.read_file(path)? {
            let existing = match R::id(&entity) {
                Some(id) => match self.resource.get(&id).await {
                    Ok(found) => Some(found),
                    Err(err) if err.is_not_found() => None,
                    Err(err) => {
                        return Err(err)
                            .with_context(|| format!("failed to get {} {}", R::KIND, id))
                    }
                },
                None => None,
            };

            let result = match existing {
                None => {
                    tracing::debug!(kind = R::KIND, "entity does not exist, creating");
                    let rq = self.resource.create_request_from(&entity)?;
                    self.resource
                        .create(rq)
                        .await
                        .with_context(|| format!("failed to create {}", R::KIND))?
                }
                Some(_) => {
                    tracing::debug!(kind = R::KIND, "entity exists, updating");
                    let rq = self.resource.update_request_from(&entity)?;
                    self.resource
                        .update(rq)
                        .await
                        .with_context(|| format!("failed to update {}", R::KIND))?
                }
            };
            applied.push(result);
        }
        Ok(applied)
    }

    pub async fn apply_and_print(&self, args: &ApplyArgs) -> Result<()> {
        let applied = self.apply(&args.file).await?;
        self.printer.print_list(&applied)?;
        Ok(())
    }

    /// Delete all ids concurrently; results keep the input order.
    pub async fn delete(&self, ids: &[String]) -> Result<Vec<R::Entity>> {
        let deleted = try_join_all(ids.iter().map(|id| self.resource.delete(id)))
            .await
            .with_context(|| format!("failed to delete {}", R::KIND))?;
        Ok(deleted)
    }

    pub async fn delete_and_print(&self, args: &DeleteArgs) -> Result<()> {
        let ids = match &args.file {
            Some(path) => {
                let ids: Vec<String> = self.read_file(path)?.iter().filter_map(R::id).collect();
                if ids.is_empty() {
                    anyhow::bail!("{} contains no {} with an id", path.display(), R::KIND);
                }
                let question = format!("delete {} {}(s): {}?", ids.len(), R::KIND, ids.join(", "));
                if !args.yes && !file::confirm(&question)? {
                    anyhow::bail!("aborted");
                }
                ids
            }
            None => args.ids.clone(),
        };

        let deleted = self.delete(&ids).await?;
        self.print_results(&deleted)
    }

    /// Edit an entity in `$EDITOR` and update it when the content changed.
    pub async fn edit_and_print(&self, id: &str) -> Result<()> {
        let entity = self
            .resource
            .get(id)
            .await
            .with_context(|| format!("failed to get {} {}", R::KIND, id))?;

        let Some(edited) = file::edit_with(&file::editor(), &entity).await? else {
            eprintln!("{} {} unchanged", R::KIND, id);
            return Ok(());
        };

        let rq = self.resource.update_request_from(&edited)?;
        self.update_and_print(rq).await
    }

    fn read_file(&self, path: &Path) -> Result<Vec<R::Entity>> {
        file::read_documents(path).with_context(|| format!("failed to read {}", path.display()))
    }

    fn print_results(&self, entities: &[R::Entity]) -> Result<()> {
        match entities {
            [single] => self.printer.print_describe(single)?,
            many => self.printer.print_list(many)?,
        }
        Ok(())
    }
}
