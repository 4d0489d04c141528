//! Target writer: executes a plan as create, append, link.

use kn_core::NotionTarget;
use kn_core::entities::{Block, TargetPlan};
use kn_core::enums::WriteStep;
use kn_core::errors::{ItemError, MappingError};
use kn_core::ids::{ContainerId, PageId};

pub struct TargetWriter<'a, T> {
    target: &'a T,
    root: &'a ContainerId,
}

impl<'a, T: NotionTarget> TargetWriter<'a, T> {
    #[must_use]
    pub const fn new(target: &'a T, root: &'a ContainerId) -> Self {
        Self { target, root }
    }

    /// Write `plan` to the destination and return the new page.
    ///
    /// The page is created under the root, blocks are appended in plan
    /// order, then the page is linked into every non-root parent container.
    /// The first failing step aborts the rest; there is no retry here.
    ///
    /// # Errors
    ///
    /// [`ItemError::Structural`] if a media block is still unresolved,
    /// otherwise [`ItemError::TargetWrite`] naming the failed step.
    pub async fn commit(&self, plan: &TargetPlan) -> Result<PageId, ItemError> {
        let page = self.create(plan).await?;
        self.fill(&page, plan).await?;
        Ok(page)
    }

    /// First half of [`commit`](Self::commit): check the plan and create the
    /// empty page under the root.
    ///
    /// # Errors
    ///
    /// [`ItemError::Structural`] for an unresolved media block, or a
    /// `create_page` write failure.
    pub async fn create(&self, plan: &TargetPlan) -> Result<PageId, ItemError> {
        if let Some(locator) = first_pending_media(plan) {
            return Err(MappingError::UnresolvedMedia(locator.to_string()).into());
        }

        let page = self
            .target
            .create_page(self.root, &plan.title)
            .await
            .map_err(|e| ItemError::write(WriteStep::CreatePage, e))?;
        tracing::debug!(item = %plan.source_id, page = %page, "page created");
        Ok(page)
    }

    /// Second half of [`commit`](Self::commit): append the blocks to `page`,
    /// then link it into every non-root container.
    ///
    /// # Errors
    ///
    /// [`ItemError::TargetWrite`] naming `append_blocks` or `link_page`.
    pub async fn fill(&self, page: &PageId, plan: &TargetPlan) -> Result<(), ItemError> {
        if !plan.blocks.is_empty() {
            self.target
                .append_blocks(page, &plan.blocks)
                .await
                .map_err(|e| ItemError::write(WriteStep::AppendBlocks, e))?;
        }

        for container in plan.parent_container_ids.iter().filter(|c| *c != self.root) {
            self.target
                .link_page(container, page)
                .await
                .map_err(|e| ItemError::write(WriteStep::LinkPage, e))?;
        }

        Ok(())
    }
}

fn first_pending_media(plan: &TargetPlan) -> Option<&str> {
    plan.blocks.iter().find_map(|block| match block {
        Block::Media(media) if media.uploaded.is_none() => {
            Some(media.attachment.source_locator.as_str())
        }
        _ => None,
    })
}
