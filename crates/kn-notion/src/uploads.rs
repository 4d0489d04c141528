//! Direct file uploads: create an upload object, then send the bytes.

use kn_core::entities::{MAX_MEDIA_BYTES, MediaPayload, UploadedReference};
use kn_core::errors::TargetError;
use serde::Deserialize;
use serde_json::json;

use crate::NotionClient;
use crate::http::{decode, send_with_retry};

/// Single-part upload limit.
pub const MAX_UPLOAD_BYTES: usize = MAX_MEDIA_BYTES;

#[derive(Debug, Deserialize)]
struct FileUpload {
    id: String,
    #[serde(default)]
    status: String,
}

impl NotionClient {
    pub(crate) async fn upload(
        &self,
        payload: MediaPayload,
    ) -> Result<UploadedReference, TargetError> {
        check_size(&payload)?;

        let body = json!({
            "filename": payload.file_name,
            "content_type": payload.content_type,
        });
        let resp = send_with_retry(self.max_retries, || {
            Ok(self
                .request(reqwest::Method::POST, "/file_uploads")
                .json(&body))
        })
        .await?;
        let created: FileUpload = decode(resp).await?;

        let path = format!("/file_uploads/{}/send", created.id);
        let size = payload.bytes.len();
        let mut body = RetryBody::new(payload.bytes, self.max_retries);
        let resp = send_with_retry(self.max_retries, || {
            let part = reqwest::multipart::Part::bytes(body.next_attempt())
                .file_name(payload.file_name.clone())
                .mime_str(&payload.content_type)
                .map_err(|e| TargetError::Rejected(format!("content type: {e}")))?;
            let form = reqwest::multipart::Form::new().part("file", part);
            Ok(self
                .request(reqwest::Method::POST, &path)
                .multipart(form))
        })
        .await?;
        let sent: FileUpload = decode(resp).await?;

        if sent.status != "uploaded" {
            return Err(TargetError::Parse(format!(
                "file upload {} ended in status '{}'",
                sent.id, sent.status
            )));
        }
        tracing::debug!(
            upload_id = %sent.id,
            file = %payload.file_name,
            size,
            "uploaded media"
        );
        Ok(UploadedReference {
            upload_id: sent.id,
            kind: payload.kind,
        })
    }
}

/// Hands the upload bytes to each send attempt. Only attempts that may be
/// followed by a retry get a copy; the last possible attempt takes the buffer.
struct RetryBody {
    bytes: Option<Vec<u8>>,
    remaining_retries: u32,
}

impl RetryBody {
    fn new(bytes: Vec<u8>, max_retries: u32) -> Self {
        Self {
            bytes: Some(bytes),
            remaining_retries: max_retries,
        }
    }

    fn next_attempt(&mut self) -> Vec<u8> {
        if self.remaining_retries == 0 {
            return self.bytes.take().unwrap_or_default();
        }
        self.remaining_retries -= 1;
        self.bytes.clone().unwrap_or_default()
    }
}

fn check_size(payload: &MediaPayload) -> Result<(), TargetError> {
    if payload.bytes.len() > MAX_UPLOAD_BYTES {
        return Err(TargetError::Rejected(format!(
            "{} is {} bytes, over the {MAX_UPLOAD_BYTES}-byte upload limit",
            payload.file_name,
            payload.bytes.len()
        )));
    }
    Ok(())
}
