//! Kind and state enums for keep2notion.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! `ItemState` provides `allowed_next_states()` to enforce the per-item pipeline
//! state machine at the orchestrator.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ItemKind
// ---------------------------------------------------------------------------

/// Top-level Keep node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Note,
    List,
}

impl ItemKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::List => "list",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MediaKind
// ---------------------------------------------------------------------------

/// Attachment media class. Keep drawings are carried as images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Audio,
}

impl MediaKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Audio => "audio",
        }
    }

    /// Content type used when the source does not report one.
    #[must_use]
    pub const fn fallback_mime(self) -> &'static str {
        match self {
            Self::Image => "image/png",
            Self::Audio => "audio/mpeg",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ItemState
// ---------------------------------------------------------------------------

/// Progress of one item through the import pipeline.
///
/// ```text
/// pending → mapped → media_resolved → committed
///         ↘ skipped        ↘ failed  ↘ failed
///         ↘ failed
/// ```
///
/// `mapped → committed` is allowed directly: media resolution is a
/// pass-through when the item has no attachments or media import is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ItemState {
    Pending,
    Mapped,
    MediaResolved,
    Committed,
    Failed,
    Skipped,
}

impl ItemState {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Mapped, Self::Skipped, Self::Failed],
            Self::Mapped => &[Self::MediaResolved, Self::Committed, Self::Failed],
            Self::MediaResolved => &[Self::Committed, Self::Failed],
            Self::Committed | Self::Failed | Self::Skipped => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Committed | Self::Failed | Self::Skipped)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Mapped => "mapped",
            Self::MediaResolved => "media_resolved",
            Self::Committed => "committed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// WriteStep
// ---------------------------------------------------------------------------

/// Destination write step, used to classify `TargetWriteError`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum WriteStep {
    ResolveContainer,
    CreatePage,
    AppendBlocks,
    LinkPage,
}

impl WriteStep {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ResolveContainer => "resolve_container",
            Self::CreatePage => "create_page",
            Self::AppendBlocks => "append_blocks",
            Self::LinkPage => "link_page",
        }
    }
}

impl fmt::Display for WriteStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
