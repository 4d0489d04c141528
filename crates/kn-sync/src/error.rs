use std::path::PathBuf;

use kn_core::errors::RunError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to read ledger {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to append to ledger {}: {source}", path.display())]
    Append {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<LedgerError> for RunError {
    fn from(err: LedgerError) -> Self {
        Self::Ledger(err.to_string())
    }
}
