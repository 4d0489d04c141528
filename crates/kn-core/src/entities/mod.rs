//! Entity structs for the source and destination sides of an import.
//!
//! Source entities are normalized from Keep nodes by a `KeepSource`. Plan
//! entities are produced by the entity mapper and consumed by the target writer.

mod item;
mod plan;

pub use item::{AttachmentRef, ItemContent, LabelRef, ListEntry, SourceItem};
pub use plan::{
    Block, MAX_MEDIA_BYTES, MediaBlock, MediaPayload, TargetPlan, UploadedReference,
};
