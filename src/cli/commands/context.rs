//! Context management of the config file

use crate::cli::display::{ColorTheme, StatusIcon, TableRow};
use crate::cli::session::Session;
use crate::domain::config::{CliConfig, Context};
use clap::{Args, Parser, Subcommand};
use comfy_table::Cell;
use serde::Serialize;

/// A context as it is printed, without its token.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct ContextView {
    pub active: bool,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    pub has_token: bool,
}

impl ContextView {
    pub fn of(config: &CliConfig, context: &Context) -> Self {
        Self {
            active: config.is_current(&context.name),
            name: context.name.clone(),
            api_url: context.api_url.clone(),
            default_project: context.default_project.clone(),
            timeout: context.timeout,
            provider: context.provider.clone(),
            has_token: context.api_token.as_deref().is_some_and(|t| !t.is_empty()),
        }
    }

    pub fn all(config: &CliConfig) -> Vec<Self> {
        config.contexts.iter().map(|c| Self::of(config, c)).collect()
    }
}

impl TableRow for ContextView {
    fn header(wide: bool) -> Vec<&'static str> {
        let mut header = vec!["ACTIVE", "NAME", "PROJECT"];
        if wide {
            header.extend(["API URL", "PROVIDER", "TOKEN"]);
        }
        header
    }

    fn row(&self, wide: bool, theme: &ColorTheme) -> Vec<Cell> {
        let mut row = vec![
            Cell::new(StatusIcon::flag(self.active)).fg(theme.bool_color(self.active)),
            Cell::new(&self.name),
            Cell::new(self.default_project.as_deref().unwrap_or_default()),
        ];
        if wide {
            row.push(Cell::new(self.api_url.as_deref().unwrap_or_default()));
            row.push(Cell::new(self.provider.as_deref().unwrap_or_default()));
            row.push(Cell::new(StatusIcon::flag(self.has_token)));
        }
        row
    }
}

#[derive(Subcommand, Debug)]
pub enum ContextCommand {
    /// List contexts
    List,

    /// Print the name of the active context
    ShowCurrent,

    /// Add a context
    Add(ContextAddCommand),

    /// Change settings of a context
    Update(ContextUpdateCommand),

    /// Remove a context
    Remove(ContextNameArgs),

    /// Activate a context, `-` goes back to the previous one
    Switch(ContextNameArgs),

    /// Set the default project of the active context, an empty value clears it
    SetProject(SetProjectArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ContextFields {
    /// API endpoint of the context
    #[arg(long)]
    pub url: Option<String>,

    /// API token of the context
    #[arg(long)]
    pub token: Option<String>,

    #[arg(long)]
    pub default_project: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub request_timeout: Option<u64>,

    /// Login provider, e.g. github
    #[arg(long)]
    pub provider: Option<String>,
}

impl ContextFields {
    fn apply(&self, context: &mut Context) {
        if let Some(v) = &self.url {
            context.api_url = Some(v.clone());
        }
        if let Some(v) = &self.token {
            context.api_token = Some(v.clone());
        }
        if let Some(v) = &self.default_project {
            context.default_project = Some(v.clone());
        }
        if let Some(v) = self.request_timeout {
            context.timeout = Some(v);
        }
        if let Some(v) = &self.provider {
            context.provider = Some(v.clone());
        }
    }
}

#[derive(Parser, Debug, Clone, Default)]
pub struct ContextAddCommand {
    pub name: String,

    /// Make the new context the active one
    #[arg(long)]
    pub activate: bool,

    #[command(flatten)]
    pub fields: ContextFields,
}

#[derive(Parser, Debug, Clone, Default)]
pub struct ContextUpdateCommand {
    pub name: String,

    #[arg(long)]
    pub activate: bool,

    #[command(flatten)]
    pub fields: ContextFields,
}

#[derive(Parser, Debug, Clone)]
pub struct ContextNameArgs {
    pub name: String,
}

#[derive(Parser, Debug, Clone)]
pub struct SetProjectArgs {
    #[arg(value_name = "PROJECT")]
    pub default_project: String,
}

impl ContextCommand {
    /// Apply the command to `config`, returning whether it has to be saved.
    pub fn apply(&self, config: &mut CliConfig) -> anyhow::Result<bool> {
        match self {
            ContextCommand::List | ContextCommand::ShowCurrent => Ok(false),
            ContextCommand::Add(cmd) => {
                let mut context = Context::new(cmd.name.clone());
                cmd.fields.apply(&mut context);
                config.add(context, cmd.activate)?;
                Ok(true)
            }
            ContextCommand::Update(cmd) => {
                config.update(&cmd.name, |c| cmd.fields.apply(c))?;
                if cmd.activate {
                    config.switch(&cmd.name)?;
                }
                Ok(true)
            }
            ContextCommand::Remove(args) => {
                config.remove(&args.name)?;
                Ok(true)
            }
            ContextCommand::Switch(args) => {
                config.switch(&args.name)?;
                Ok(true)
            }
            ContextCommand::SetProject(args) => {
                config.set_project(&args.default_project)?;
                Ok(true)
            }
        }
    }

    pub async fn execute(&self, session: &Session) -> anyhow::Result<()> {
        let mut config = session.config.clone();
        if self.apply(&mut config)? {
            session.save_config(&config)?;
        }

        match self {
            ContextCommand::List => session.printer.print_list(&ContextView::all(&config))?,
            ContextCommand::ShowCurrent => {
                let Some(name) = config.current_context.as_deref() else {
                    anyhow::bail!("no context is active");
                };
                println!("{}", name);
            }
            ContextCommand::Add(cmd) => eprintln!("context {} added", cmd.name),
            ContextCommand::Update(cmd) => eprintln!("context {} updated", cmd.name),
            ContextCommand::Remove(args) => eprintln!("context {} removed", args.name),
            ContextCommand::Switch(_) => {
                eprintln!(
                    "switched to context {}",
                    config.current_context.as_deref().unwrap_or_default()
                )
            }
            ContextCommand::SetProject(args) => {
                if args.default_project.is_empty() {
                    eprintln!("default project cleared");
                } else {
                    eprintln!("default project set to {}", args.default_project);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CliConfig {
        let mut config = CliConfig::default();
        config.add(Context::new("prod"), true).unwrap();
        config.add(Context::new("dev"), false).unwrap();
        config
    }

    #[test]
    fn test_add_with_fields_and_activate() {
        let mut config = config();
        let cmd = ContextCommand::Add(ContextAddCommand {
            name: "staging".to_string(),
            activate: true,
            fields: ContextFields {
                default_project: Some("p-1".to_string()),
                ..Default::default()
            },
        });
        assert!(cmd.apply(&mut config).unwrap());
        assert!(config.is_current("staging"));
        assert_eq!(config.previous_context.as_deref(), Some("prod"));
        assert_eq!(
            config.get("staging").unwrap().default_project.as_deref(),
            Some("p-1")
        );
    }

    #[test]
    fn test_switch_back_and_forth() {
        let mut config = config();
        let switch = |name: &str| {
            ContextCommand::Switch(ContextNameArgs {
                name: name.to_string(),
            })
        };
        switch("dev").apply(&mut config).unwrap();
        switch("-").apply(&mut config).unwrap();
        assert!(config.is_current("prod"));
        switch("-").apply(&mut config).unwrap();
        assert!(config.is_current("dev"));
    }

    #[test]
    fn test_view_hides_token() {
        let mut config = config();
        config
            .update("prod", |c| c.api_token = Some("secret".to_string()))
            .unwrap();
        let views = ContextView::all(&config);
        assert!(views[0].active && views[0].has_token);
        assert!(!views[1].active);
        let yaml = serde_yaml::to_string(&views).unwrap();
        assert!(!yaml.contains("secret"));
    }

    #[test]
    fn test_list_does_not_modify() {
        let mut config = config();
        assert!(!ContextCommand::List.apply(&mut config).unwrap());
    }
}
