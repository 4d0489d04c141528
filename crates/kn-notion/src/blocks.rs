//! Block rendering: plan blocks to Notion block objects.

use kn_core::entities::{Block, MediaBlock};
use kn_core::enums::MediaKind;
use kn_core::errors::TargetError;
use serde_json::{Value, json};

use crate::rich_text::rich_text;

/// Render one block. A media block without an uploaded reference is rejected.
///
/// # Errors
///
/// Returns [`TargetError::Rejected`] for an unresolved media block.
pub fn render(block: &Block) -> Result<Value, TargetError> {
    Ok(match block {
        Block::Paragraph { text } => text_block("paragraph", text),
        Block::BulletedListItem { text } => text_block("bulleted_list_item", text),
        Block::NumberedListItem { text } => text_block("numbered_list_item", text),
        Block::Quote { text } => text_block("quote", text),
        Block::ChecklistItem { text, checked } => json!({
            "object": "block",
            "type": "to_do",
            "to_do": { "rich_text": rich_text(text), "checked": checked }
        }),
        Block::Media(media) => media_block(media)?,
    })
}

/// Render a slice of blocks in order.
///
/// # Errors
///
/// See [`render`].
pub fn render_all(blocks: &[Block]) -> Result<Vec<Value>, TargetError> {
    blocks.iter().map(render).collect()
}

/// Block that makes `page_id` reachable from wherever it is appended.
#[must_use]
pub fn link_to_page(page_id: &str) -> Value {
    json!({
        "object": "block",
        "type": "link_to_page",
        "link_to_page": { "type": "page_id", "page_id": page_id }
    })
}

fn text_block(kind: &str, text: &str) -> Value {
    json!({
        "object": "block",
        "type": kind,
        kind: { "rich_text": rich_text(text) }
    })
}

fn media_block(media: &MediaBlock) -> Result<Value, TargetError> {
    let uploaded = media.uploaded.as_ref().ok_or_else(|| {
        TargetError::Rejected(format!(
            "media block for {} has no uploaded reference",
            media.attachment.source_locator
        ))
    })?;
    let kind = match uploaded.kind {
        MediaKind::Image => "image",
        MediaKind::Audio => "audio",
    };
    Ok(json!({
        "object": "block",
        "type": kind,
        kind: { "type": "file_upload", "file_upload": { "id": uploaded.upload_id } }
    }))
}
