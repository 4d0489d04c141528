use anyhow::Context;
use kn_config::KnConfig;

use crate::cli::GlobalFlags;

/// Load `.env`, then the layered configuration, honoring `--config`.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<KnConfig> {
    let explicit = flags.config.as_deref();
    let config = KnConfig::load_with_dotenv(explicit).with_context(|| match explicit {
        Some(path) => format!("failed to load configuration from {}", path.display()),
        None => "failed to load configuration".to_string(),
    })?;

    if !config.keep.is_configured() {
        tracing::debug!("keep.email is not set");
    }
    if !config.notion.is_configured() {
        tracing::debug!("notion.token or notion.root_url is not set");
    }

    Ok(config)
}
