pub mod auth;
mod import;
mod list;

use anyhow::Context;
use kn_config::{ConfigError, KnConfig};
use kn_keep::KeepClient;

use crate::cli::{Commands, GlobalFlags};
use crate::progress::Progress;

/// Per-request timeout for Google endpoints.
const KEEP_TIMEOUT_SECS: u64 = 60;

/// Route a parsed command to its handler.
pub async fn dispatch(
    command: &Commands,
    flags: &GlobalFlags,
    config: &KnConfig,
) -> anyhow::Result<()> {
    match command {
        Commands::Import(args) => import::handle(args, flags, config).await,
        Commands::List(args) => list::handle(args, flags, config).await,
        Commands::Auth { action } => auth::handle(action, flags, config).await,
    }
}

/// HTTP client for the Google token exchange.
fn google_http() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(KEEP_TIMEOUT_SECS))
        .build()
        .context("failed to build HTTP client")
}

/// The configured Keep account, or an error naming the missing setting.
fn keep_email(config: &KnConfig) -> anyhow::Result<&str> {
    if !config.keep.is_configured() {
        return Err(ConfigError::NotConfigured {
            section: "keep".into(),
            missing: "email".into(),
        }
        .into());
    }
    Ok(config.keep.email.trim())
}

/// Authenticate with the stored master token and open a Keep client.
async fn connect_keep(config: &KnConfig) -> anyhow::Result<KeepClient> {
    let email = keep_email(config)?;
    let spinner = Progress::spinner("signing in to Google Keep");
    let session = kn_auth::resume(&google_http()?, email, &config.keep.android_id).await;
    spinner.finish_clear();

    let session = session.with_context(|| format!("failed to sign in to Keep as {email}"))?;
    KeepClient::new(session, KEEP_TIMEOUT_SECS).context("failed to create Keep client")
}
