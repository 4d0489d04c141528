//! # kn-notion
//!
//! Notion REST client for keep2notion.
//!
//! Implements [`NotionTarget`] over the public API: pages are created under
//! a parent page, content is appended as block children (at most 100 per
//! request), pages are linked into label containers with `link_to_page`
//! blocks, and media goes through direct file uploads.

pub mod blocks;
mod http;
mod pages;
pub mod rich_text;
mod uploads;

pub use pages::MAX_BLOCKS_PER_APPEND;
pub use uploads::MAX_UPLOAD_BYTES;

use kn_core::NotionTarget;
use kn_core::entities::{Block, MediaPayload, UploadedReference};
use kn_core::errors::TargetError;
use kn_core::ids::{ContainerId, PageId};

const API_BASE_URL: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";

/// Authenticated Notion client.
pub struct NotionClient {
    http: reqwest::Client,
    token: String,
    max_retries: u32,
}

impl NotionClient {
    /// Create a client for an internal integration token.
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::Http`] if the HTTP client fails to build.
    pub fn new(token: &str, timeout_secs: u64, max_retries: u32) -> Result<Self, TargetError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("keep2notion/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| TargetError::Http(e.to_string()))?;
        Ok(Self {
            http,
            token: token.trim().to_string(),
            max_retries,
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{API_BASE_URL}{path}"))
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
    }
}

impl NotionTarget for NotionClient {
    async fn find_child_pages(
        &self,
        parent: &ContainerId,
        title: &str,
    ) -> Result<Vec<ContainerId>, TargetError> {
        self.find_child_pages_titled(parent, title).await
    }

    async fn create_page(&self, parent: &ContainerId, title: &str) -> Result<PageId, TargetError> {
        self.create_page_under(parent, title).await
    }

    async fn append_blocks(&self, page: &PageId, blocks: &[Block]) -> Result<(), TargetError> {
        if blocks.is_empty() {
            return Ok(());
        }
        self.append_children(page, blocks).await
    }

    async fn link_page(&self, container: &ContainerId, page: &PageId) -> Result<(), TargetError> {
        self.append_link(container, page).await
    }

    async fn upload_media(&self, payload: MediaPayload) -> Result<UploadedReference, TargetError> {
        self.upload(payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_carry_auth_and_version_headers() {
        let client = NotionClient::new(" secret_abc ", 30, 0).unwrap();
        let request = client
            .request(reqwest::Method::GET, "/users/me")
            .build()
            .unwrap();
        assert_eq!(request.url().as_str(), "https://api.notion.com/v1/users/me");
        assert_eq!(
            request.headers()["authorization"].to_str().unwrap(),
            "Bearer secret_abc"
        );
        assert_eq!(request.headers()["notion-version"], NOTION_VERSION);
    }

    #[tokio::test]
    async fn empty_append_sends_nothing() {
        let client = NotionClient::new("secret", 30, 0).unwrap();
        client
            .append_blocks(&PageId::new("p-1"), &[])
            .await
            .expect("no request should be made");
    }
}
