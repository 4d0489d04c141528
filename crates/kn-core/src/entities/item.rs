use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ItemKind, MediaKind};

/// A label in the source account. Names are unique and case-sensitive.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct LabelRef {
    pub name: String,
}

impl LabelRef {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Opaque handle to a Keep attachment, resolvable only through the source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct AttachmentRef {
    pub source_locator: String,
    pub mime_kind: MediaKind,
    /// Content type as reported by the source, when known.
    pub mime_type: Option<String>,
}

/// One checklist entry of a Keep list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ListEntry {
    pub text: String,
    pub checked: bool,
}

impl ListEntry {
    #[must_use]
    pub fn new(text: impl Into<String>, checked: bool) -> Self {
        Self {
            text: text.into(),
            checked,
        }
    }
}

/// Body of a source item: free text for notes, ordered entries for lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemContent {
    Note { body: String },
    List { entries: Vec<ListEntry> },
}

/// A normalized Keep note or list. `id` is the idempotence key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SourceItem {
    pub id: String,
    pub title: String,
    pub content: ItemContent,
    pub labels: BTreeSet<LabelRef>,
    pub attachments: Vec<AttachmentRef>,
    pub archived: bool,
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SourceItem {
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        match self.content {
            ItemContent::Note { .. } => ItemKind::Note,
            ItemContent::List { .. } => ItemKind::List,
        }
    }

    /// Note body, `None` for lists.
    #[must_use]
    pub fn body_text(&self) -> Option<&str> {
        match &self.content {
            ItemContent::Note { body } => Some(body),
            ItemContent::List { .. } => None,
        }
    }

    /// List entries, `None` for notes.
    #[must_use]
    pub fn list_entries(&self) -> Option<&[ListEntry]> {
        match &self.content {
            ItemContent::Note { .. } => None,
            ItemContent::List { entries } => Some(entries),
        }
    }

    #[must_use]
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|label| label.name == name)
    }
}
