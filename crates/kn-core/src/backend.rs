//! Seams between the import pipeline and the two remote services.
//!
//! The pipeline in `kn-sync` is generic over these traits. `kn-keep` and
//! `kn-notion` provide the HTTP implementations; tests use in-memory fakes.
//! Every call is awaited to completion before the next one is issued.

#![allow(async_fn_in_trait)]

use crate::entities::{AttachmentRef, Block, MediaPayload, SourceItem, UploadedReference};
use crate::errors::{MediaError, SourceError, TargetError};
use crate::filter::ItemFilter;
use crate::ids::{ContainerId, PageId};

/// Read side: the Keep account being exported from.
pub trait KeepSource {
    /// List every item matching `filter`, in source order.
    ///
    /// Calling this again re-queries the source.
    async fn list_items(&self, filter: &ItemFilter) -> Result<Vec<SourceItem>, SourceError>;

    /// Fetch the bytes behind an attachment handle.
    async fn fetch_media(&self, attachment: &AttachmentRef) -> Result<MediaPayload, MediaError>;
}

/// Write side: the Notion workspace being imported into.
pub trait NotionTarget {
    /// Every live direct child page of `parent` whose title equals `title`
    /// exactly, in listing order.
    ///
    /// Item pages and label containers share the root, so callers decide
    /// which of several same-titled pages is a container.
    async fn find_child_pages(
        &self,
        parent: &ContainerId,
        title: &str,
    ) -> Result<Vec<ContainerId>, TargetError>;

    /// Create an empty page titled `title` under `parent`.
    async fn create_page(&self, parent: &ContainerId, title: &str) -> Result<PageId, TargetError>;

    /// Append `blocks` to `page`, preserving order.
    async fn append_blocks(&self, page: &PageId, blocks: &[Block]) -> Result<(), TargetError>;

    /// Make `page` reachable from `container` without duplicating its content.
    async fn link_page(&self, container: &ContainerId, page: &PageId) -> Result<(), TargetError>;

    /// Upload media bytes, returning a reference usable in a media block.
    async fn upload_media(&self, payload: MediaPayload) -> Result<UploadedReference, TargetError>;
}
