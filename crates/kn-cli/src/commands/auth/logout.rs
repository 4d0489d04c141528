use kn_config::KnConfig;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Serialize)]
struct AuthLogoutResponse {
    email: String,
    cleared: bool,
}

pub fn handle(flags: &GlobalFlags, config: &KnConfig) -> anyhow::Result<()> {
    let email = crate::commands::keep_email(config)?;
    kn_auth::logout(email)?;
    output(
        &AuthLogoutResponse {
            email: email.to_string(),
            cleared: true,
        },
        flags.format,
    )
}
