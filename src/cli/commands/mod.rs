// CLI command definitions

pub mod auth;
pub mod cluster;
pub mod context;
pub mod ip;
pub mod payment;
pub mod project;
pub mod storage;
pub mod system;
pub mod tenant;
pub mod token;

use crate::cli::display::{ColorMode, OutputFormat};
use crate::cli::session::Session;
use crate::domain::config::SettingsOverrides;
use crate::infrastructure::constants::{
    ENV_API_TOKEN, ENV_API_URL, ENV_CONFIG, ENV_CONTEXT, ENV_PROJECT,
};
use auth::{LoginCommand, LogoutCommand, WhoamiCommand};
use clap::{Args, Parser};
use cluster::ClusterCommand;
use context::ContextCommand;
use ip::IpCommand;
use payment::PaymentCommand;
use project::ProjectCommand;
use std::path::PathBuf;
use storage::StorageCommand;
use system::{ApiMethodsCommand, HealthCommand, VersionCommand};
use tenant::TenantCommand;
use token::TokenCommand;

#[derive(Parser, Debug)]
#[command(
    name = "metal",
    version,
    about = "CLI for metalstack.cloud",
    long_about = "Manage Kubernetes clusters, storage, IPs, projects and API tokens on metalstack.cloud"
)]
pub struct CliArgs {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags accepted by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file (default: ~/.metal-stack-cloud/config.toml)
    #[arg(long, global = true, env = ENV_CONFIG, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Context to use instead of the active one
    #[arg(long, global = true, env = ENV_CONTEXT)]
    pub context: Option<String>,

    /// API endpoint
    #[arg(long, global = true, env = ENV_API_URL)]
    pub api_url: Option<String>,

    /// API token
    #[arg(long, global = true, env = ENV_API_TOKEN, hide_env_values = true)]
    pub api_token: Option<String>,

    /// Project of project-scoped commands (default: the context's default project)
    #[arg(short = 'p', long, global = true, env = ENV_PROJECT)]
    pub project: Option<String>,

    /// Output format (default: table for lists, yaml otherwise)
    #[arg(short = 'o', long = "output-format", global = true, value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Template applied to every printed entity, e.g. '{{ .uuid }} {{ .name }}'
    #[arg(long, global = true)]
    pub template: Option<String>,

    /// Disable colored output
    #[arg(long, global = true, conflicts_with = "force_color")]
    pub no_color: bool,

    /// Color output even when not writing to a terminal
    #[arg(long, global = true)]
    pub force_color: bool,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Log debug output to stderr
    #[arg(long, global = true)]
    pub debug: bool,
}

impl GlobalArgs {
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            context: self.context.clone(),
            api_url: self.api_url.clone(),
            api_token: self.api_token.clone(),
            project: self.project.clone(),
            timeout: self.timeout,
        }
    }

    pub fn color_mode(&self) -> ColorMode {
        if self.no_color {
            ColorMode::Never
        } else if self.force_color {
            ColorMode::Always
        } else {
            ColorMode::Auto
        }
    }
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Manage Kubernetes clusters
    #[command(subcommand)]
    Cluster(ClusterCommand),

    /// Manage volumes and snapshots
    #[command(subcommand)]
    Storage(StorageCommand),

    /// Manage IP addresses
    #[command(subcommand)]
    Ip(IpCommand),

    /// Manage tenants
    #[command(subcommand)]
    Tenant(TenantCommand),

    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommand),

    /// Manage API tokens
    #[command(subcommand)]
    Token(TokenCommand),

    /// Payment information
    #[command(subcommand)]
    Payment(PaymentCommand),

    /// Manage contexts of the config file, lists them without a subcommand
    Context {
        #[command(subcommand)]
        command: Option<ContextCommand>,
    },

    /// Log in with the browser
    Login(LoginCommand),

    /// Remove the API token of the active context
    Logout(LogoutCommand),

    /// Show who the API token belongs to
    Whoami(WhoamiCommand),

    /// Show the health of the API
    Health(HealthCommand),

    /// Show client and server version
    Version(VersionCommand),

    /// List the API methods the token may call
    ApiMethods(ApiMethodsCommand),
}

impl Commands {
    pub async fn execute(&self, session: &Session) -> anyhow::Result<()> {
        match self {
            Commands::Cluster(cmd) => cmd.execute(session).await,
            Commands::Storage(cmd) => cmd.execute(session).await,
            Commands::Ip(cmd) => cmd.execute(session).await,
            Commands::Tenant(cmd) => cmd.execute(session).await,
            Commands::Project(cmd) => cmd.execute(session).await,
            Commands::Token(cmd) => cmd.execute(session).await,
            Commands::Payment(cmd) => cmd.execute(session).await,
            Commands::Context { command } => {
                command
                    .as_ref()
                    .unwrap_or(&ContextCommand::List)
                    .execute(session)
                    .await
            }
            Commands::Login(cmd) => cmd.execute(session).await,
            Commands::Logout(cmd) => cmd.execute(session).await,
            Commands::Whoami(cmd) => cmd.execute(session).await,
            Commands::Health(cmd) => cmd.execute(session).await,
            Commands::Version(cmd) => cmd.execute(session).await,
            Commands::ApiMethods(cmd) => cmd.execute(session).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = CliArgs::try_parse_from([
            "metal", "cluster", "list", "-p", "p-1", "-o", "wide", "--no-color",
        ])
        .unwrap();
        assert_eq!(args.global.project.as_deref(), Some("p-1"));
        assert_eq!(args.global.output_format, Some(OutputFormat::Wide));
        assert_eq!(args.global.color_mode(), ColorMode::Never);
    }

    #[test]
    fn test_color_flags_conflict() {
        assert!(CliArgs::try_parse_from(["metal", "health", "--no-color", "--force-color"]).is_err());
    }

    #[test]
    fn test_context_without_subcommand() {
        let args = CliArgs::try_parse_from(["metal", "context"]).unwrap();
        assert!(matches!(args.command, Commands::Context { command: None }));
    }
}
