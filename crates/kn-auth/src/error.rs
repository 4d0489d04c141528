use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no stored Keep credentials for {email}; run `keep2notion auth login`")]
    NotAuthenticated { email: String },

    #[error("Google rejected the token exchange: {0}")]
    Rejected(String),

    #[error("token exchange request failed: {0}")]
    Http(String),

    #[error("keyring error: {0}")]
    KeyringError(String),

    #[error("token store error: {0}")]
    TokenStoreError(String),

    #[error("{0}")]
    Other(String),
}
