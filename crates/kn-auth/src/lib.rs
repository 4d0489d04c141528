//! # kn-auth
//!
//! Google Keep authentication for keep2notion.
//!
//! Keep has no public API, so access goes through the Android client flow: a
//! long-lived master token (supplied once by the user) is stored per account
//! and exchanged for a short-lived OAuth token at the start of every run.
//!
//! Storage tiers: OS keychain (`keyring`), then the
//! `KEEP2NOTION_KEEP__MASTER_TOKEN` env var, then a 0600 file under
//! `~/.keep2notion/credentials/`.

pub mod error;
pub mod session;
pub mod token_store;

pub use error::AuthError;
pub use session::{Credentials, KeepSession};
pub use token_store::TokenSource;

/// Verify a master token against Google and persist it for `email`.
///
/// The token is only stored after a successful exchange.
///
/// # Errors
///
/// Returns the exchange error unchanged, or `AuthError::TokenStoreError` if
/// the token cannot be persisted.
pub async fn login(
    client: &reqwest::Client,
    email: &str,
    master_token: &str,
    android_id: &str,
) -> Result<KeepSession, AuthError> {
    let credentials = Credentials {
        email: email.to_string(),
        master_token: master_token.trim().to_string(),
        android_id: resolve_android_id(android_id)?,
    };
    let session = session::authenticate(client, &credentials).await?;
    token_store::store(email, &credentials.master_token)?;
    tracing::info!(email, "stored Keep master token");
    Ok(session)
}

/// Open a session from the stored master token.
///
/// # Errors
///
/// Returns `AuthError::NotAuthenticated` if no token is stored for `email`,
/// otherwise any exchange error.
pub async fn resume(
    client: &reqwest::Client,
    email: &str,
    android_id: &str,
) -> Result<KeepSession, AuthError> {
    let (master_token, source) =
        token_store::load(email).ok_or_else(|| AuthError::NotAuthenticated {
            email: email.to_string(),
        })?;
    tracing::debug!(email, source = source.as_str(), "loaded Keep master token");

    let credentials = Credentials {
        email: email.to_string(),
        master_token,
        android_id: resolve_android_id(android_id)?,
    };
    session::authenticate(client, &credentials).await
}

/// Where the stored master token for `email` comes from, if any.
#[must_use]
pub fn token_source(email: &str) -> Option<TokenSource> {
    token_store::load(email).map(|(_, source)| source)
}

/// Clear stored credentials for `email`.
///
/// # Errors
///
/// Returns `AuthError::TokenStoreError` if the credentials file cannot be removed.
pub fn logout(email: &str) -> Result<(), AuthError> {
    token_store::delete(email)
}

fn resolve_android_id(configured: &str) -> Result<String, AuthError> {
    let configured = configured.trim();
    if configured.is_empty() {
        session::generate_android_id()
    } else {
        Ok(configured.to_string())
    }
}
