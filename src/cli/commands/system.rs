//! Health, version and method listings of the API

use crate::cli::session::Session;
use crate::domain::api::ClientServerVersion;
use clap::Parser;

/// Show the health of the API services
#[derive(Parser, Debug, Clone, Default)]
pub struct HealthCommand {}

impl HealthCommand {
    pub async fn execute(&self, session: &Session) -> anyhow::Result<()> {
        let health = session.client.health().await?;
        session.printer.print_list(&health.services)?;

        let unhealthy = health.services.iter().filter(|s| !s.is_serving()).count();
        if unhealthy > 0 {
            tracing::warn!(unhealthy, "not all services are serving");
        }
        Ok(())
    }
}

/// Show the client and server version
#[derive(Parser, Debug, Clone, Default)]
pub struct VersionCommand {}

impl VersionCommand {
    pub async fn execute(&self, session: &Session) -> anyhow::Result<()> {
        let server = match session.client.version().await {
            Ok(version) => Some(version),
            Err(e) => {
                tracing::warn!(error = %e, "failed to get server version");
                None
            }
        };
        let version = ClientServerVersion {
            client: env!("CARGO_PKG_VERSION").to_string(),
            server,
        };
        session.printer.print_describe(&version)?;
        Ok(())
    }
}

/// List the API methods the current token may call
#[derive(Parser, Debug, Clone, Default)]
pub struct ApiMethodsCommand {}

impl ApiMethodsCommand {
    pub async fn execute(&self, session: &Session) -> anyhow::Result<()> {
        let methods = session.client.token_scoped_methods().await?;
        session.printer.print_list(&methods.permissions)?;
        Ok(())
    }
}
