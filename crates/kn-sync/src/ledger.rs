//! Import ledger.
//!
//! Appends one JSONL record per committed item so a later run can skip
//! items it already imported. Uses `serde_jsonlines::append_json_lines`
//! for per-line appends.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use kn_core::ids::PageId;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub source_id: String,
    pub page_id: PageId,
    pub title: String,
    pub imported_at: DateTime<Utc>,
}

/// Ledger of committed items, keyed by source id.
///
/// Every recorded page id is kept, including those of entries that do not
/// count for skipping, so item pages can be told apart from containers.
#[derive(Debug, Default)]
pub struct ImportLedger {
    path: Option<PathBuf>,
    imported: HashMap<String, PageId>,
    pages: Vec<PageId>,
}

impl ImportLedger {
    /// Open the ledger at `path`.
    ///
    /// With `load_existing = false` earlier entries are ignored for skipping,
    /// but their pages are still reported by [`item_pages`](Self::item_pages)
    /// and new commits are still appended.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Read`] if an existing ledger cannot be read or
    /// holds a malformed line.
    pub fn open(path: impl Into<PathBuf>, load_existing: bool) -> Result<Self, LedgerError> {
        let path = path.into();
        let mut imported = HashMap::new();
        let mut pages = Vec::new();

        if path.exists() {
            let read_err = |source| LedgerError::Read {
                path: path.clone(),
                source,
            };
            for entry in serde_jsonlines::json_lines::<LedgerEntry, _>(&path).map_err(read_err)? {
                let entry = entry.map_err(read_err)?;
                pages.push(entry.page_id.clone());
                if load_existing {
                    imported.insert(entry.source_id, entry.page_id);
                }
            }
            tracing::debug!(
                path = %path.display(),
                entries = pages.len(),
                skipping = imported.len(),
                "loaded import ledger"
            );
        }

        Ok(Self {
            path: Some(path),
            imported,
            pages,
        })
    }

    /// A ledger that records and skips nothing.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Page recorded for `source_id` by an earlier run.
    #[must_use]
    pub fn page_for(&self, source_id: &str) -> Option<&PageId> {
        self.imported.get(source_id)
    }

    /// Pages of every item this ledger has ever recorded.
    #[must_use]
    pub fn item_pages(&self) -> &[PageId] {
        &self.pages
    }

    #[must_use]
    pub fn contains(&self, source_id: &str) -> bool {
        self.imported.contains_key(source_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.imported.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.imported.is_empty()
    }

    /// Append `entry` and remember it.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Append`] if the file cannot be written.
    pub fn record(&mut self, entry: LedgerEntry) -> Result<(), LedgerError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let append_err = |source| LedgerError::Append {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(append_err)?;
        }
        serde_jsonlines::append_json_lines(path, [&entry]).map_err(append_err)?;
        self.pages.push(entry.page_id.clone());
        self.imported.insert(entry.source_id, entry.page_id);
        Ok(())
    }
}
