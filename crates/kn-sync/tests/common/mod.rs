//! In-memory `KeepSource` and `NotionTarget` fakes.

#![allow(dead_code)]

use std::collections::{BTreeSet, HashSet};
use std::sync::Mutex;

use chrono::Utc;
use kn_core::entities::{
    AttachmentRef, Block, ItemContent, LabelRef, ListEntry, MediaPayload, SourceItem,
    UploadedReference,
};
use kn_core::enums::MediaKind;
use kn_core::errors::{MediaError, SourceError, TargetError};
use kn_core::filter::ItemFilter;
use kn_core::ids::{ContainerId, PageId};
use kn_core::{KeepSource, NotionTarget};

pub const ROOT: &str = "00000000-0000-0000-0000-000000000000";

pub fn root() -> ContainerId {
    ContainerId::new(ROOT)
}

// ---------------------------------------------------------------------------
// Source items
// ---------------------------------------------------------------------------

pub fn note(id: &str, title: &str, body: &str, labels: &[&str]) -> SourceItem {
    item(
        id,
        title,
        ItemContent::Note { body: body.into() },
        labels,
    )
}

pub fn list(id: &str, title: &str, entries: &[(&str, bool)], labels: &[&str]) -> SourceItem {
    item(
        id,
        title,
        ItemContent::List {
            entries: entries
                .iter()
                .map(|(text, checked)| ListEntry::new(*text, *checked))
                .collect(),
        },
        labels,
    )
}

fn item(id: &str, title: &str, content: ItemContent, labels: &[&str]) -> SourceItem {
    SourceItem {
        id: id.into(),
        title: title.into(),
        content,
        labels: labels.iter().map(|name| LabelRef::new(*name)).collect(),
        attachments: Vec::new(),
        archived: false,
        pinned: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn image(locator: &str) -> AttachmentRef {
    AttachmentRef {
        source_locator: locator.into(),
        mime_kind: MediaKind::Image,
        mime_type: Some("image/png".into()),
    }
}

// ---------------------------------------------------------------------------
// FakeKeep
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeKeep {
    pub items: Vec<SourceItem>,
    pub unavailable: bool,
    pub broken_media: HashSet<String>,
    pub media_fetches: Mutex<Vec<String>>,
}

impl FakeKeep {
    pub fn with_items(items: Vec<SourceItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn fetched(&self) -> Vec<String> {
        self.media_fetches.lock().unwrap().clone()
    }
}

impl KeepSource for FakeKeep {
    async fn list_items(&self, filter: &ItemFilter) -> Result<Vec<SourceItem>, SourceError> {
        if self.unavailable {
            return Err(SourceError::Auth("BadAuthentication".into()));
        }
        Ok(self
            .items
            .iter()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect())
    }

    async fn fetch_media(&self, attachment: &AttachmentRef) -> Result<MediaPayload, MediaError> {
        self.media_fetches
            .lock()
            .unwrap()
            .push(attachment.source_locator.clone());
        if self.broken_media.contains(&attachment.source_locator) {
            return Err(MediaError::Fetch {
                locator: attachment.source_locator.clone(),
                reason: "HTTP error: 404".into(),
            });
        }
        Ok(MediaPayload {
            file_name: format!("{}.png", attachment.source_locator.replace('/', "_")),
            content_type: "image/png".into(),
            kind: attachment.mime_kind,
            bytes: attachment.source_locator.as_bytes().to_vec(),
        })
    }
}

// ---------------------------------------------------------------------------
// FakeNotion
// ---------------------------------------------------------------------------

/// Every write the fake received, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    CreatePage { parent: ContainerId, title: String },
    AppendBlocks { page: PageId, count: usize },
    LinkPage { container: ContainerId, page: PageId },
    Upload { file_name: String },
}

#[derive(Debug, Clone)]
pub struct FakePage {
    pub id: PageId,
    pub parent: ContainerId,
    pub title: String,
    pub blocks: Vec<Block>,
}

#[derive(Default)]
pub struct FakeNotion {
    pub pages: Mutex<Vec<FakePage>>,
    pub writes: Mutex<Vec<Write>>,
    pub lookups: Mutex<Vec<String>>,
    pub fail_create: HashSet<String>,
    pub fail_append_for: HashSet<String>,
    pub fail_link: bool,
    pub reject_uploads: bool,
}

impl FakeNotion {
    /// Seed an existing child page of the root.
    pub fn with_existing_container(self, id: &str, title: &str) -> Self {
        self.pages.lock().unwrap().push(FakePage {
            id: PageId::new(id),
            parent: root(),
            title: title.into(),
            blocks: Vec::new(),
        });
        self
    }

    pub fn writes(&self) -> Vec<Write> {
        self.writes.lock().unwrap().clone()
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }

    pub fn page_titled(&self, title: &str) -> Option<FakePage> {
        self.pages
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.title == title)
            .cloned()
    }

    pub fn created_titles(&self) -> Vec<String> {
        self.writes()
            .into_iter()
            .filter_map(|w| match w {
                Write::CreatePage { title, .. } => Some(title),
                _ => None,
            })
            .collect()
    }

    pub fn links_to(&self, page: &PageId) -> BTreeSet<ContainerId> {
        self.writes()
            .into_iter()
            .filter_map(|w| match w {
                Write::LinkPage { container, page: p } if &p == page => Some(container),
                _ => None,
            })
            .collect()
    }

    fn record(&self, write: Write) {
        self.writes.lock().unwrap().push(write);
    }
}

impl NotionTarget for FakeNotion {
    async fn find_child_pages(
        &self,
        parent: &ContainerId,
        title: &str,
    ) -> Result<Vec<ContainerId>, TargetError> {
        self.lookups.lock().unwrap().push(title.to_string());
        Ok(self
            .pages
            .lock()
            .unwrap()
            .iter()
            .filter(|p| &p.parent == parent && p.title == title)
            .map(|p| ContainerId::from(p.id.clone()))
            .collect())
    }

    async fn create_page(&self, parent: &ContainerId, title: &str) -> Result<PageId, TargetError> {
        if self.fail_create.contains(title) {
            return Err(TargetError::Api {
                status: 403,
                code: Some("restricted_resource".into()),
                message: "Insufficient permissions".into(),
            });
        }
        let mut pages = self.pages.lock().unwrap();
        let id = PageId::new(format!("page-{}", pages.len() + 1));
        pages.push(FakePage {
            id: id.clone(),
            parent: parent.clone(),
            title: title.into(),
            blocks: Vec::new(),
        });
        drop(pages);
        self.record(Write::CreatePage {
            parent: parent.clone(),
            title: title.into(),
        });
        Ok(id)
    }

    async fn append_blocks(&self, page: &PageId, blocks: &[Block]) -> Result<(), TargetError> {
        let mut pages = self.pages.lock().unwrap();
        let target = pages
            .iter_mut()
            .find(|p| &p.id == page)
            .ok_or_else(|| TargetError::Api {
                status: 404,
                code: Some("object_not_found".into()),
                message: format!("no page {page}"),
            })?;
        if self.fail_append_for.contains(&target.title) {
            return Err(TargetError::Http("connection reset".into()));
        }
        target.blocks.extend_from_slice(blocks);
        drop(pages);
        self.record(Write::AppendBlocks {
            page: page.clone(),
            count: blocks.len(),
        });
        Ok(())
    }

    async fn link_page(&self, container: &ContainerId, page: &PageId) -> Result<(), TargetError> {
        if self.fail_link {
            return Err(TargetError::RateLimited {
                retry_after_secs: 60,
            });
        }
        self.record(Write::LinkPage {
            container: container.clone(),
            page: page.clone(),
        });
        Ok(())
    }

    async fn upload_media(&self, payload: MediaPayload) -> Result<UploadedReference, TargetError> {
        if self.reject_uploads {
            return Err(TargetError::Rejected("upload refused".into()));
        }
        self.record(Write::Upload {
            file_name: payload.file_name.clone(),
        });
        Ok(UploadedReference {
            upload_id: format!("upload-{}", payload.file_name),
            kind: payload.kind,
        })
    }
}
