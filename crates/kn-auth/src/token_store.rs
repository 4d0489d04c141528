//! Keep master token persistence.
//!
//! Tokens are keyed by account email. Lookup order: keyring, then the
//! `KEEP2NOTION_KEEP__MASTER_TOKEN` env var, then `~/.keep2notion/credentials/<email>`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AuthError;

const DEFAULT_KEYRING_SERVICE: &str = "keep2notion";
const MASTER_TOKEN_ENV: &str = "KEEP2NOTION_KEEP__MASTER_TOKEN";

/// Returns the keyring service name.
///
/// Defaults to `"keep2notion"`. Override via `KEEP2NOTION_KEYRING_SERVICE`
/// for testing to avoid touching real credentials.
fn keyring_service() -> String {
    std::env::var("KEEP2NOTION_KEYRING_SERVICE")
        .unwrap_or_else(|_| DEFAULT_KEYRING_SERVICE.to_string())
}

/// Where a stored token was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Keyring,
    Env,
    File,
}

impl TokenSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Keyring => "keyring",
            Self::Env => "env",
            Self::File => "file",
        }
    }
}

/// Store a master token in the OS keychain. Falls back to file if keyring unavailable.
///
/// # Errors
///
/// Returns `AuthError::TokenStoreError` if both keyring and file storage fail.
pub fn store(email: &str, master_token: &str) -> Result<(), AuthError> {
    match keyring::Entry::new(&keyring_service(), email) {
        Ok(entry) => match entry.set_password(master_token) {
            Ok(()) => Ok(()),
            Err(error) => {
                tracing::warn!(%error, "keyring store failed; falling back to file");
                store_file(&credentials_path(email)?, master_token)
            }
        },
        Err(error) => {
            tracing::warn!(%error, "keyring unavailable; falling back to file");
            store_file(&credentials_path(email)?, master_token)
        }
    }
}

/// Load the master token for `email` together with the tier it came from.
#[must_use]
pub fn load(email: &str) -> Option<(String, TokenSource)> {
    if let Ok(entry) = keyring::Entry::new(&keyring_service(), email) {
        if let Ok(token) = entry.get_password() {
            if !token.is_empty() {
                return Some((token, TokenSource::Keyring));
            }
        }
    }

    if let Ok(token) = std::env::var(MASTER_TOKEN_ENV) {
        if !token.is_empty() {
            return Some((token, TokenSource::Env));
        }
    }

    let path = credentials_path(email).ok()?;
    load_file(&path).map(|token| (token, TokenSource::File))
}

/// Delete stored credentials for `email` from keyring and file.
///
/// # Errors
///
/// Returns `AuthError::TokenStoreError` if the credentials file cannot be removed.
pub fn delete(email: &str) -> Result<(), AuthError> {
    if let Ok(entry) = keyring::Entry::new(&keyring_service(), email) {
        let _ = entry.delete_credential();
    }

    let path = credentials_path(email)?;
    if path.exists() {
        fs::remove_file(&path).map_err(|e| {
            AuthError::TokenStoreError(format!("failed to delete {}: {e}", path.display()))
        })?;
    }

    Ok(())
}

// --- Private file helpers ---

fn credentials_path(email: &str) -> Result<PathBuf, AuthError> {
    if email.is_empty() || email.contains(['/', '\\']) {
        return Err(AuthError::TokenStoreError(format!(
            "'{email}' cannot be used as a credentials file name"
        )));
    }
    dirs::home_dir()
        .map(|h| h.join(".keep2notion").join("credentials").join(email))
        .ok_or_else(|| {
            AuthError::TokenStoreError("home directory not found, cannot store credentials".into())
        })
}

fn store_file(path: &Path, token: &str) -> Result<(), AuthError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AuthError::TokenStoreError(format!("mkdir {}: {e}", parent.display())))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
            }
        }
    }
    fs::write(path, token)
        .map_err(|e| AuthError::TokenStoreError(format!("write {}: {e}", path.display())))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .map_err(|e| AuthError::TokenStoreError(format!("chmod {}: {e}", path.display())))?;
    }

    Ok(())
}

fn load_file(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_path_is_per_email_under_home() {
        let path = credentials_path("me@example.com").expect("should resolve");
        assert!(path.ends_with(".keep2notion/credentials/me@example.com"));
    }

    #[test]
    fn credentials_path_rejects_separators() {
        assert!(credentials_path("../evil").is_err());
        assert!(credentials_path("").is_err());
    }

    #[test]
    fn file_store_load_cycle() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let path = tmp.path().join("creds").join("me@example.com");

        store_file(&path, "aas_et/master").expect("store");
        assert_eq!(load_file(&path).as_deref(), Some("aas_et/master"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path)
                .expect("metadata")
                .permissions()
                .mode()
                & 0o777;
            assert_eq!(mode, 0o600, "credentials file should be 0600");
        }
    }

    #[test]
    fn load_file_ignores_whitespace_only_content() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let path = tmp.path().join("me@example.com");
        std::fs::write(&path, "   \n  ").expect("write");
        assert!(load_file(&path).is_none());
    }
}
