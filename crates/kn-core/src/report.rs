//! Run report types returned by the import orchestrator and printed by the CLI.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ItemKind, ItemState};
use crate::ids::PageId;

/// A per-item note: a failure reason or a partial-success warning.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ItemNote {
    pub item_id: String,
    pub reason: String,
}

/// Final state of one processed item.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ItemReport {
    pub item_id: String,
    pub title: String,
    pub kind: ItemKind,
    pub state: ItemState,
    pub page_id: Option<PageId>,
    pub reason: Option<String>,
    pub notes: Vec<String>,
}

impl ItemReport {
    #[must_use]
    pub fn new(item_id: impl Into<String>, title: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            item_id: item_id.into(),
            title: title.into(),
            kind,
            state: ItemState::Pending,
            page_id: None,
            reason: None,
            notes: Vec::new(),
        }
    }
}

/// Aggregated outcome of one import run. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RunResult {
    pub processed: u32,
    pub imported: u32,
    pub skipped: u32,
    pub failed: Vec<ItemNote>,
    pub warnings: Vec<ItemNote>,
    pub outcomes: Vec<ItemReport>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunResult {
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Compact view for table output.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            processed: self.processed,
            imported: self.imported,
            skipped: self.skipped,
            failed: u32::try_from(self.failed.len()).unwrap_or(u32::MAX),
            warnings: u32::try_from(self.warnings.len()).unwrap_or(u32::MAX),
            duration_ms: u64::try_from(
                (self.finished_at - self.started_at).num_milliseconds().max(0),
            )
            .unwrap_or_default(),
        }
    }
}

/// Counts-only summary of a run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: u32,
    pub imported: u32,
    pub skipped: u32,
    pub failed: u32,
    pub warnings: u32,
    pub duration_ms: u64,
}

/// Accumulates item outcomes while a run is in progress.
///
/// Only `finish()` produces a `RunResult`, so the published report cannot be
/// mutated after the run ends.
#[derive(Debug)]
pub struct RunTally {
    processed: u32,
    imported: u32,
    skipped: u32,
    failed: Vec<ItemNote>,
    warnings: Vec<ItemNote>,
    outcomes: Vec<ItemReport>,
    started_at: DateTime<Utc>,
}

impl Default for RunTally {
    fn default() -> Self {
        Self::start()
    }
}

impl RunTally {
    #[must_use]
    pub fn start() -> Self {
        Self {
            processed: 0,
            imported: 0,
            skipped: 0,
            failed: Vec::new(),
            warnings: Vec::new(),
            outcomes: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// Record a finished item. Non-terminal reports are counted as processed only.
    pub fn record(&mut self, report: ItemReport) {
        self.processed += 1;
        match report.state {
            ItemState::Committed => self.imported += 1,
            ItemState::Skipped => self.skipped += 1,
            ItemState::Failed => self.failed.push(ItemNote {
                item_id: report.item_id.clone(),
                reason: report
                    .reason
                    .clone()
                    .unwrap_or_else(|| "unknown failure".to_string()),
            }),
            ItemState::Pending | ItemState::Mapped | ItemState::MediaResolved => {}
        }
        self.warnings
            .extend(report.notes.iter().map(|note| ItemNote {
                item_id: report.item_id.clone(),
                reason: note.clone(),
            }));
        self.outcomes.push(report);
    }

    #[must_use]
    pub const fn processed(&self) -> u32 {
        self.processed
    }

    #[must_use]
    pub fn finish(self) -> RunResult {
        RunResult {
            processed: self.processed,
            imported: self.imported,
            skipped: self.skipped,
            failed: self.failed,
            warnings: self.warnings,
            outcomes: self.outcomes,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }
}
