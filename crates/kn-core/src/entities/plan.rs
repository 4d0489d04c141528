use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::AttachmentRef;
use crate::enums::MediaKind;
use crate::ids::ContainerId;

/// Reference to media already uploaded to the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UploadedReference {
    pub upload_id: String,
    pub kind: MediaKind,
}

/// Media placeholder: carries the attachment until media transfer fills in
/// the uploaded reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MediaBlock {
    pub attachment: AttachmentRef,
    pub uploaded: Option<UploadedReference>,
}

impl MediaBlock {
    #[must_use]
    pub const fn pending(attachment: AttachmentRef) -> Self {
        Self {
            attachment,
            uploaded: None,
        }
    }
}

/// One content block of a destination page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph { text: String },
    BulletedListItem { text: String },
    NumberedListItem { text: String },
    Quote { text: String },
    ChecklistItem { text: String, checked: bool },
    Media(MediaBlock),
}

impl Block {
    #[must_use]
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph { text: text.into() }
    }

    #[must_use]
    pub fn checklist_item(text: impl Into<String>, checked: bool) -> Self {
        Self::ChecklistItem {
            text: text.into(),
            checked,
        }
    }

    #[must_use]
    pub const fn is_media(&self) -> bool {
        matches!(self, Self::Media(_))
    }
}

/// Destination document for one source item, in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TargetPlan {
    pub source_id: String,
    pub title: String,
    pub blocks: Vec<Block>,
    pub parent_container_ids: BTreeSet<ContainerId>,
}

impl TargetPlan {
    #[must_use]
    pub fn media_count(&self) -> usize {
        self.blocks.iter().filter(|block| block.is_media()).count()
    }

    #[must_use]
    pub fn checklist_items(&self) -> Vec<(&str, bool)> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::ChecklistItem { text, checked } => Some((text.as_str(), *checked)),
                _ => None,
            })
            .collect()
    }

    /// Remove every media block, returning how many were dropped.
    pub fn strip_media(&mut self) -> usize {
        let before = self.blocks.len();
        self.blocks.retain(|block| !block.is_media());
        before - self.blocks.len()
    }
}

/// Largest attachment moved between the services: the destination's
/// single-part upload limit. Sources stop reading past it.
pub const MAX_MEDIA_BYTES: usize = 20 * 1024 * 1024;

/// Media bytes fetched from the source, ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPayload {
    pub file_name: String,
    pub content_type: String,
    pub kind: MediaKind,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment() -> AttachmentRef {
        AttachmentRef {
            source_locator: "note/blob".into(),
            mime_kind: MediaKind::Image,
            mime_type: None,
        }
    }

    #[test]
    fn strip_media_keeps_text_order() {
        let mut plan = TargetPlan {
            source_id: "x".into(),
            title: "x".into(),
            blocks: vec![
                Block::paragraph("a"),
                Block::Media(MediaBlock::pending(attachment())),
                Block::checklist_item("b", true),
            ],
            parent_container_ids: BTreeSet::new(),
        };

        assert_eq!(plan.media_count(), 1);
        assert_eq!(plan.strip_media(), 1);
        assert_eq!(
            plan.blocks,
            vec![Block::paragraph("a"), Block::checklist_item("b", true)]
        );
    }

    #[test]
    fn block_serializes_with_type_tag() {
        let json = serde_json::to_value(Block::checklist_item("milk", false)).unwrap();
        assert_eq!(json["type"], "checklist_item");
        assert_eq!(json["text"], "milk");
        assert_eq!(json["checked"], false);
    }
}
