//! Login, logout and token introspection

use crate::cli::display::format::timestamp;
use crate::cli::display::{ColorTheme, TableRow};
use crate::cli::session::Session;
use crate::infrastructure::auth::{decode_claims, login_url, open_browser, LoginListener, TokenClaims};
use crate::infrastructure::constants::{DEFAULT_LOGIN_PROVIDER, LOGIN_TIMEOUT_SECS};
use chrono::{DateTime, Utc};
use clap::Parser;
use comfy_table::Cell;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Log in with the browser and store the token in the active context
#[derive(Parser, Debug, Clone, Default)]
pub struct LoginCommand {
    /// OAuth provider (default: the context's provider, then github)
    #[arg(long)]
    pub provider: Option<String>,

    /// Only print the login URL
    #[arg(long)]
    pub no_browser: bool,
}

impl LoginCommand {
    pub async fn execute(&self, session: &Session) -> anyhow::Result<()> {
        let provider = self
            .provider
            .clone()
            .or_else(|| session.settings.provider.clone())
            .unwrap_or_else(|| DEFAULT_LOGIN_PROVIDER.to_string());

        let listener = LoginListener::bind().await?;
        let url = login_url(&session.settings.api_url, &provider, listener.port()?);
        eprintln!("Please log in at {}", url);
        if !self.no_browser {
            open_browser(&url).await;
        }

        let token = listener
            .wait_for_token(Duration::from_secs(LOGIN_TIMEOUT_SECS))
            .await?;

        let mut config = session.config.clone();
        let context = config.set_token(
            session.settings.context_name.as_deref(),
            &token,
            Some(&provider),
        )?;
        session.save_config(&config)?;
        tracing::info!(context = %context, provider = %provider, "login successful");
        eprintln!("logged in, token stored in context {}", context);
        Ok(())
    }
}

/// Remove the token from the active context
#[derive(Parser, Debug, Clone, Default)]
pub struct LogoutCommand {}

impl LogoutCommand {
    pub async fn execute(&self, session: &Session) -> anyhow::Result<()> {
        let mut config = session.config.clone();
        let context = config.clear_token(session.settings.context_name.as_deref())?;
        session.save_config(&config)?;
        eprintln!("logged out of context {}", context);
        Ok(())
    }
}

/// What the API token says about its owner
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Whoami {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub subject: String,
    pub issuer: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub token_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub expired: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub roles: BTreeMap<String, String>,
}

impl Whoami {
    pub fn new(context: Option<String>, claims: TokenClaims, now: DateTime<Utc>) -> Self {
        Self {
            context,
            expired: claims.is_expired(now),
            issued_at: claims.issued_at(),
            expires_at: claims.expires_at(),
            subject: claims.sub,
            issuer: claims.iss,
            token_type: claims.token_type,
            roles: claims.roles,
        }
    }
}

impl TableRow for Whoami {
    fn header(_wide: bool) -> Vec<&'static str> {
        vec!["SUBJECT", "ISSUER", "EXPIRES", "ROLES"]
    }

    fn row(&self, _wide: bool, theme: &ColorTheme) -> Vec<Cell> {
        let roles: Vec<String> = self
            .roles
            .iter()
            .map(|(subject, role)| format!("{}={}", subject, role))
            .collect();
        vec![
            Cell::new(&self.subject),
            Cell::new(&self.issuer),
            Cell::new(timestamp(self.expires_at)).fg(if self.expired {
                theme.error
            } else {
                theme.success
            }),
            Cell::new(roles.join("\n")),
        ]
    }
}

/// Print the claims of the configured API token
#[derive(Parser, Debug, Clone, Default)]
pub struct WhoamiCommand {}

impl WhoamiCommand {
    pub async fn execute(&self, session: &Session) -> anyhow::Result<()> {
        let Some(token) = session.settings.api_token.as_deref() else {
            anyhow::bail!("not logged in, run `metal login` or set an API token");
        };

        let claims = decode_claims(token)?;
        let whoami = Whoami::new(session.settings.context_name.clone(), claims, Utc::now());
        session.printer.print_describe(&whoami)?;

        if whoami.expired {
            eprintln!(
                "the token expired at {}, run `metal login` again",
                timestamp(whoami.expires_at)
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whoami_from_claims() {
        let claims = TokenClaims {
            sub: "jane@github".to_string(),
            iss: "https://api.metalstack.cloud".to_string(),
            exp: Some(100),
            ..Default::default()
        };
        let whoami = Whoami::new(Some("prod".to_string()), claims, Utc::now());
        assert!(whoami.expired);
        assert_eq!(whoami.subject, "jane@github");

        let yaml = serde_yaml::to_string(&whoami).unwrap();
        assert!(yaml.contains("context: prod"));
        assert!(yaml.contains("expired: true"));
        assert!(!yaml.contains("roles"));
    }
}
