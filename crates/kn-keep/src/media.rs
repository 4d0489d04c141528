//! Attachment download.
//!
//! Keep serves media through a redirecting endpoint: an authorized GET on
//! `media/v2/{locator}` answers with a `Location` pointing at the bytes.

use kn_core::entities::{AttachmentRef, MAX_MEDIA_BYTES, MediaPayload};

use crate::KeepClient;
use crate::error::KeepError;
use crate::http::{check_response, redirect_location};

const MEDIA_BASE_URL: &str = "https://keep.google.com/media/v2/";

impl KeepClient {
    /// Resolve the short-lived download URL for an attachment.
    ///
    /// # Errors
    ///
    /// Returns [`KeepError::NoMediaLocation`] if Keep answers without a redirect.
    pub async fn media_link(&self, attachment: &AttachmentRef) -> Result<String, KeepError> {
        let token = self.oauth_token().await?;
        let url = format!("{MEDIA_BASE_URL}{}", attachment.source_locator);
        let resp = self
            .no_redirect
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, format!("OAuth {token}"))
            .send()
            .await?;

        if let Some(location) = redirect_location(&resp) {
            return Ok(location);
        }
        check_response(resp).await?;
        Err(KeepError::NoMediaLocation(attachment.source_locator.clone()))
    }

    /// Download an attachment's bytes, refusing anything over [`MAX_MEDIA_BYTES`].
    ///
    /// # Errors
    ///
    /// Returns [`KeepError::TooLarge`] for oversized attachments, otherwise
    /// [`KeepError`] if the link cannot be resolved or the download fails.
    pub async fn download(&self, attachment: &AttachmentRef) -> Result<MediaPayload, KeepError> {
        let link = self.media_link(attachment).await?;
        let resp = check_response(self.http.get(&link).send().await?).await?;

        let header_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string());
        let content_type = attachment
            .mime_type
            .clone()
            .or(header_type)
            .unwrap_or_else(|| attachment.mime_kind.fallback_mime().to_string());

        let bytes = read_capped(resp, MAX_MEDIA_BYTES, &attachment.source_locator).await?;
        tracing::debug!(
            locator = %attachment.source_locator,
            content_type,
            size = bytes.len(),
            "downloaded attachment"
        );

        Ok(MediaPayload {
            file_name: file_name(&attachment.source_locator, &content_type),
            content_type,
            kind: attachment.mime_kind,
            bytes,
        })
    }
}

/// Read a body in chunks, stopping as soon as it is known to exceed `limit`.
/// A declared `Content-Length` over the limit fails before any byte is read.
async fn read_capped(
    mut resp: reqwest::Response,
    limit: usize,
    locator: &str,
) -> Result<Vec<u8>, KeepError> {
    let too_large = |size: u64| KeepError::TooLarge {
        locator: locator.to_string(),
        size,
        limit,
    };
    let declared = resp
        .content_length()
        .map(|len| usize::try_from(len).unwrap_or(usize::MAX));
    if let Some(len) = declared
        && len > limit
    {
        return Err(too_large(len as u64));
    }

    let mut buf = Vec::with_capacity(declared.unwrap_or(0));
    while let Some(chunk) = resp.chunk().await? {
        let read = buf.len() + chunk.len();
        if read > limit {
            return Err(too_large(read as u64));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

/// `{last locator segment}.{extension}`.
fn file_name(locator: &str, content_type: &str) -> String {
    let stem = locator.rsplit('/').next().unwrap_or(locator);
    format!("{stem}.{}", extension_for(content_type))
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "audio/mpeg" | "audio/mp3" => "mp3",
        "audio/mp4" | "audio/m4a" | "audio/x-m4a" => "m4a",
        "audio/amr" => "amr",
        "audio/3gpp" => "3gp",
        "audio/ogg" => "ogg",
        "audio/wav" | "audio/x-wav" => "wav",
        _ => "bin",
    }
}
