use std::io::{BufRead, IsTerminal};

use anyhow::Context;
use kn_config::KnConfig;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthLoginArgs;
use crate::output::output;

#[derive(Serialize)]
struct AuthLoginResponse {
    email: String,
    authenticated: bool,
    token_source: Option<String>,
    expires_at: String,
}

pub async fn handle(
    args: &AuthLoginArgs,
    flags: &GlobalFlags,
    config: &KnConfig,
) -> anyhow::Result<()> {
    let email = crate::commands::keep_email(config)?;
    let master_token = match &args.master_token {
        Some(token) => token.clone(),
        None => read_token(std::io::stdin().lock())?,
    };
    let master_token = master_token.trim();
    if master_token.is_empty() {
        anyhow::bail!("master token is empty");
    }

    let session = kn_auth::login(
        &crate::commands::google_http()?,
        email,
        master_token,
        &config.keep.android_id,
    )
    .await
    .with_context(|| format!("failed to verify master token for {email}"))?;

    output(
        &AuthLoginResponse {
            email: email.to_string(),
            authenticated: true,
            token_source: kn_auth::token_source(email).map(|source| source.as_str().to_string()),
            expires_at: session.expires_at().to_rfc3339(),
        },
        flags.format,
    )
}

/// Read the first line of `input`, prompting when stdin is a terminal.
fn read_token(mut input: impl BufRead) -> anyhow::Result<String> {
    if std::io::stdin().is_terminal() {
        eprint!("Keep master token: ");
    }
    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("failed to read master token from stdin")?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn token_is_read_from_the_first_line() {
        let token = read_token("aas_et/abc\nignored\n".as_bytes()).expect("token");
        assert_eq!(token, "aas_et/abc");
    }

    #[test]
    fn empty_input_yields_empty_token() {
        assert_eq!(read_token("".as_bytes()).expect("token"), "");
    }
}
