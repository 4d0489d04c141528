//! Node tree assembly: turns the flat changes feed into normalized items.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Utc};
use kn_core::entities::{AttachmentRef, ItemContent, LabelRef, ListEntry, SourceItem};
use kn_core::enums::MediaKind;

use crate::nodes::{BlobType, NodeType, RawLabel, RawNode};

/// Accumulates nodes and labels across feed pages.
///
/// A node seen again on a later page replaces the earlier copy in place, so
/// first-seen order is kept.
#[derive(Debug, Default)]
pub struct NodeTree {
    nodes: Vec<RawNode>,
    index: HashMap<String, usize>,
    labels: HashMap<String, RawLabel>,
}

impl NodeTree {
    pub fn merge_nodes(&mut self, nodes: Vec<RawNode>) {
        for node in nodes {
            if let Some(&pos) = self.index.get(&node.id) {
                self.nodes[pos] = node;
            } else {
                self.index.insert(node.id.clone(), self.nodes.len());
                self.nodes.push(node);
            }
        }
    }

    pub fn merge_labels(&mut self, labels: Vec<RawLabel>) {
        for label in labels {
            self.labels.insert(label.main_id.clone(), label);
        }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Build one `SourceItem` per live top-level note or list.
    #[must_use]
    pub fn items(&self) -> Vec<SourceItem> {
        let mut children: HashMap<&str, Vec<&RawNode>> = HashMap::new();
        for node in &self.nodes {
            if !node.is_top_level() && !node.timestamps.is_removed() {
                children.entry(node.parent_id.as_str()).or_default().push(node);
            }
        }

        self.nodes
            .iter()
            .filter(|node| node.is_top_level() && !node.timestamps.is_removed())
            .filter_map(|node| {
                let kids = children.get(node.id.as_str()).map_or(&[][..], Vec::as_slice);
                self.normalize(node, kids)
            })
            .collect()
    }

    fn normalize(&self, node: &RawNode, children: &[&RawNode]) -> Option<SourceItem> {
        let list_items = ordered_entries(children);

        let content = match node.node_type {
            NodeType::Note => ItemContent::Note {
                body: list_items
                    .first()
                    .map(|child| child.text.clone())
                    .unwrap_or_default(),
            },
            NodeType::List => ItemContent::List {
                entries: list_items
                    .iter()
                    .map(|child| ListEntry::new(child.text.clone(), child.checked))
                    .collect(),
            },
            NodeType::ListItem | NodeType::Blob => {
                tracing::debug!(id = %node.id, "ignoring top-level {:?} node", node.node_type);
                return None;
            }
        };

        let attachments = match &node.server_id {
            Some(note_server_id) => children
                .iter()
                .filter(|child| child.node_type == NodeType::Blob)
                .filter_map(|child| attachment(note_server_id, child))
                .collect(),
            None => Vec::new(),
        };

        Some(SourceItem {
            id: node.id.clone(),
            title: node.title.clone(),
            content,
            labels: self.label_refs(node),
            attachments,
            archived: node.is_archived,
            pinned: node.is_pinned,
            created_at: node.timestamps.created.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            updated_at: node.timestamps.updated.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        })
    }

    fn label_refs(&self, node: &RawNode) -> BTreeSet<LabelRef> {
        node.label_ids
            .iter()
            .filter(|link| link.deleted.is_none_or(|t| t.timestamp() <= 0))
            .filter_map(|link| match self.labels.get(&link.label_id) {
                Some(label) if !label.timestamps.is_removed() => Some(LabelRef::new(&label.name)),
                Some(_) => None,
                None => {
                    tracing::debug!(label_id = %link.label_id, note = %node.id, "unknown label id");
                    None
                }
            })
            .collect()
    }
}

/// List entries in display order: descending sort value, with each indented
/// entry placed right after its parent entry.
fn ordered_entries<'a>(children: &[&'a RawNode]) -> Vec<&'a RawNode> {
    let mut entries: Vec<&RawNode> = children
        .iter()
        .copied()
        .filter(|child| child.node_type == NodeType::ListItem)
        .collect();
    entries.sort_by_key(|child| std::cmp::Reverse(child.sort_key()));

    let present: HashSet<&str> = entries.iter().map(|e| e.id.as_str()).collect();

    let mut ordered = Vec::with_capacity(entries.len());
    for &entry in &entries {
        if parent_entry(entry, &present).is_some() {
            continue;
        }
        ordered.push(entry);
        for &child in &entries {
            if parent_entry(child, &present) == Some(entry.id.as_str()) {
                ordered.push(child);
            }
        }
    }
    ordered
}

fn parent_entry<'n>(entry: &'n RawNode, present: &HashSet<&str>) -> Option<&'n str> {
    entry
        .super_list_item_id
        .as_deref()
        .filter(|id| present.contains(id))
}

/// Media locator: `{note server id}/{blob server id}[/{drawing id}]`.
fn attachment(note_server_id: &str, node: &RawNode) -> Option<AttachmentRef> {
    let blob = node.blob.as_ref()?;
    let Some(blob_server_id) = &node.server_id else {
        tracing::debug!(id = %node.id, "blob has no server id yet; skipping");
        return None;
    };

    let mut source_locator = format!("{note_server_id}/{blob_server_id}");
    if blob.blob_type == BlobType::Drawing {
        let drawing = blob.drawing_info.as_ref()?;
        source_locator.push('/');
        source_locator.push_str(&drawing.drawing_id);
    }

    Some(AttachmentRef {
        source_locator,
        mime_kind: match blob.blob_type {
            BlobType::Image | BlobType::Drawing => MediaKind::Image,
            BlobType::Audio => MediaKind::Audio,
        },
        mime_type: blob.mimetype.clone().filter(|m| !m.is_empty()),
    })
}
