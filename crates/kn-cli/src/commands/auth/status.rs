use kn_config::KnConfig;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Serialize)]
struct AuthStatusResponse {
    email: Option<String>,
    authenticated: bool,
    token_source: Option<String>,
    note: Option<String>,
}

/// Report which credential tier holds the master token. Does not contact Google.
pub fn handle(flags: &GlobalFlags, config: &KnConfig) -> anyhow::Result<()> {
    let email = config.keep.email.trim();
    let status = if email.is_empty() {
        AuthStatusResponse {
            email: None,
            authenticated: false,
            token_source: None,
            note: Some("KEEP2NOTION_KEEP__EMAIL not configured".into()),
        }
    } else {
        match kn_auth::token_source(email) {
            Some(source) => AuthStatusResponse {
                email: Some(email.to_string()),
                authenticated: true,
                token_source: Some(source.as_str().to_string()),
                note: None,
            },
            None => AuthStatusResponse {
                email: Some(email.to_string()),
                authenticated: false,
                token_source: None,
                note: Some("no stored master token; run `keep2notion auth login`".into()),
            },
        }
    };

    output(&status, flags.format)
}
