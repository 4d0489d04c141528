//! Error taxonomy for keep2notion.
//!
//! Fatal errors (`RunError`) stop a run before any item is processed.
//! Everything else is attributed to a single item (`ItemError`) or a single
//! attachment (`MediaError`) and recorded in the run report.

use thiserror::Error;

use crate::enums::WriteStep;

/// Failures of the source reader. Always fatal to the run.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Authentication with the source could not be completed.
    #[error("source authentication failed: {0}")]
    Auth(String),

    /// The source could not be listed (transport or API failure).
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// A source response could not be understood.
    #[error("unexpected source response: {0}")]
    Parse(String),
}

/// Failures talking to the destination workspace.
#[derive(Debug, Error)]
pub enum TargetError {
    /// Transport-level failure (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The destination API returned a non-success status.
    #[error("API error ({status}{}): {message}", code_suffix(.code.as_deref()))]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// The destination rejected the request with 429.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// A destination response could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// The request was refused before being sent (e.g. payload too large).
    #[error("rejected: {0}")]
    Rejected(String),
}

fn code_suffix(code: Option<&str>) -> String {
    code.map(|c| format!(", {c}")).unwrap_or_default()
}

/// Per-attachment failures. Never fail the whole item.
#[derive(Debug, Error)]
pub enum MediaError {
    /// Fetching the bytes from the source failed.
    #[error("media fetch failed for {locator}: {reason}")]
    Fetch { locator: String, reason: String },

    /// Uploading the bytes to the destination failed.
    #[error("media upload failed for {locator}: {reason}")]
    Upload { locator: String, reason: String },
}

/// Structural defects in the mapping stage.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("label '{0}' has no resolved container")]
    UnresolvedLabel(String),

    #[error("media block for {0} reached the writer without an uploaded reference")]
    UnresolvedMedia(String),
}

/// Per-item failures recorded in the run report.
#[derive(Debug, Error)]
pub enum ItemError {
    /// A destination write step failed; remaining steps were not attempted.
    #[error("{step} failed: {source}")]
    TargetWrite {
        step: WriteStep,
        #[source]
        source: TargetError,
    },

    /// The mapping stage produced an inconsistent plan.
    #[error("structural mapping error: {0}")]
    Structural(#[from] MappingError),
}

impl ItemError {
    #[must_use]
    pub const fn write(step: WriteStep, source: TargetError) -> Self {
        Self::TargetWrite { step, source }
    }

    /// Write step that failed, if this is a write failure.
    #[must_use]
    pub const fn step(&self) -> Option<WriteStep> {
        match self {
            Self::TargetWrite { step, .. } => Some(*step),
            Self::Structural(_) => None,
        }
    }
}

/// Fatal run failures.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("import ledger unavailable: {0}")]
    Ledger(String),
}
