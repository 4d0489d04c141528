//! Source item filtering.
//!
//! A filter is the AND of an optional text query and an optional label set.
//! The label set matches items carrying ANY of the requested labels, which is
//! how Keep's own label search behaves.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::entities::{ItemContent, SourceItem};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFilter {
    /// Case-insensitive substring matched against title, body and list entries.
    pub query: Option<String>,
    /// Exact, case-sensitive label names.
    pub labels: Option<BTreeSet<String>>,
}

impl ItemFilter {
    #[must_use]
    pub fn new(query: Option<String>, labels: Option<BTreeSet<String>>) -> Self {
        Self {
            query: query.filter(|q| !q.is_empty()),
            labels: labels.filter(|l| !l.is_empty()),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.query.is_none() && self.labels.is_none()
    }

    #[must_use]
    pub fn matches(&self, item: &SourceItem) -> bool {
        self.matches_query(item) && self.matches_labels(item)
    }

    fn matches_query(&self, item: &SourceItem) -> bool {
        let Some(query) = &self.query else {
            return true;
        };
        let needle = query.to_lowercase();
        let contains = |text: &str| text.to_lowercase().contains(&needle);

        if contains(&item.title) {
            return true;
        }
        match &item.content {
            ItemContent::Note { body } => contains(body),
            ItemContent::List { entries } => entries.iter().any(|entry| contains(&entry.text)),
        }
    }

    fn matches_labels(&self, item: &SourceItem) -> bool {
        self.labels
            .as_ref()
            .is_none_or(|wanted| wanted.iter().any(|name| item.has_label(name)))
    }
}
