//! Media transfer: fetch attachment bytes from Keep and upload them to Notion.

use kn_core::entities::{AttachmentRef, Block, TargetPlan, UploadedReference};
use kn_core::errors::MediaError;
use kn_core::{KeepSource, NotionTarget};

pub struct MediaTransfer<'a, S, T> {
    source: &'a S,
    target: &'a T,
}

impl<'a, S: KeepSource, T: NotionTarget> MediaTransfer<'a, S, T> {
    #[must_use]
    pub const fn new(source: &'a S, target: &'a T) -> Self {
        Self { source, target }
    }

    /// Move one attachment from source to target.
    ///
    /// # Errors
    ///
    /// [`MediaError::Fetch`] for source-side failures, [`MediaError::Upload`]
    /// for target-side ones.
    pub async fn upload(&self, attachment: &AttachmentRef) -> Result<UploadedReference, MediaError> {
        let payload = self.source.fetch_media(attachment).await?;
        self.target
            .upload_media(payload)
            .await
            .map_err(|e| MediaError::Upload {
                locator: attachment.source_locator.clone(),
                reason: e.to_string(),
            })
    }

    /// Fill in every pending media block of `plan`.
    ///
    /// Blocks whose transfer fails are dropped; the returned notes describe
    /// each omission. Other blocks keep their order.
    pub async fn resolve_plan(&self, plan: &mut TargetPlan) -> Vec<String> {
        let mut notes = Vec::new();
        let mut resolved = Vec::with_capacity(plan.blocks.len());

        for block in std::mem::take(&mut plan.blocks) {
            match block {
                Block::Media(mut media) if media.uploaded.is_none() => {
                    match self.upload(&media.attachment).await {
                        Ok(uploaded) => {
                            media.uploaded = Some(uploaded);
                            resolved.push(Block::Media(media));
                        }
                        Err(err) => {
                            tracing::warn!(item = %plan.source_id, %err, "dropping media block");
                            notes.push(err.to_string());
                        }
                    }
                }
                other => resolved.push(other),
            }
        }

        plan.blocks = resolved;
        notes
    }
}
