//! # kn-keep
//!
//! Google Keep client for keep2notion.
//!
//! Reads the account through the same changes feed the Android app uses:
//! the feed is paged with `targetVersion` until it is no longer truncated,
//! then the flat node list is assembled into normalized [`SourceItem`]s.
//! Attachments are fetched through Keep's redirecting media endpoint.

mod error;
mod http;
mod media;
pub mod nodes;
pub mod tree;

pub use error::KeepError;

use kn_auth::KeepSession;
use kn_core::KeepSource;
use kn_core::entities::{AttachmentRef, MediaPayload, SourceItem};
use kn_core::errors::{MediaError, SourceError};
use kn_core::filter::ItemFilter;
use tokio::sync::Mutex;

use crate::http::check_response;
use crate::nodes::{ChangesRequest, ChangesResponse, RequestHeader};
use crate::tree::NodeTree;

const CHANGES_URL: &str = "https://www.googleapis.com/notes/v1/changes";

/// Upper bound on feed pages per listing; guards against a feed that never
/// stops reporting `truncated`.
const MAX_PAGES: usize = 1000;

/// Authenticated Keep client.
pub struct KeepClient {
    http: reqwest::Client,
    no_redirect: reqwest::Client,
    session: Mutex<KeepSession>,
}

impl KeepClient {
    /// Wrap an authenticated session.
    ///
    /// # Errors
    ///
    /// Returns [`KeepError::Http`] if the HTTP clients fail to build.
    pub fn new(session: KeepSession, timeout_secs: u64) -> Result<Self, KeepError> {
        let timeout = std::time::Duration::from_secs(timeout_secs);
        Ok(Self {
            http: reqwest::Client::builder().timeout(timeout).build()?,
            no_redirect: reqwest::Client::builder()
                .timeout(timeout)
                .redirect(reqwest::redirect::Policy::none())
                .build()?,
            session: Mutex::new(session),
        })
    }

    /// Current OAuth token, re-exchanging the master token when it has expired.
    async fn oauth_token(&self) -> Result<String, KeepError> {
        let mut session = self.session.lock().await;
        if session.is_expired() {
            tracing::info!(email = session.email(), "Keep session expired; refreshing");
            *session = kn_auth::session::authenticate(&self.http, session.credentials()).await?;
        }
        Ok(session.oauth_token().to_string())
    }

    /// Download the full node tree.
    ///
    /// # Errors
    ///
    /// Returns [`KeepError`] on transport, API, or parse failure.
    pub async fn sync_all(&self) -> Result<NodeTree, KeepError> {
        let session_id = client_session_id()?;
        let mut tree = NodeTree::default();
        let mut target_version: Option<String> = None;

        for page in 1..=MAX_PAGES {
            let body = ChangesRequest {
                nodes: Vec::new(),
                client_timestamp: client_timestamp(),
                request_header: RequestHeader::android(session_id.clone()),
                target_version: target_version.clone(),
            };
            let token = self.oauth_token().await?;
            let resp = self
                .http
                .post(CHANGES_URL)
                .header(reqwest::header::AUTHORIZATION, format!("OAuth {token}"))
                .json(&body)
                .send()
                .await?;
            let resp = check_response(resp).await?;
            let data: ChangesResponse = resp
                .json()
                .await
                .map_err(|e| KeepError::Parse(e.to_string()))?;

            if let Some(error) = data.error {
                return Err(KeepError::Api {
                    status: error.code,
                    message: error.message,
                });
            }

            tracing::debug!(page, nodes = data.nodes.len(), truncated = data.truncated, "fetched changes page");
            tree.merge_nodes(data.nodes);
            if let Some(info) = data.user_info {
                tree.merge_labels(info.labels);
            }

            if !data.truncated {
                return Ok(tree);
            }
            target_version = data.to_version;
        }

        Err(KeepError::Parse(format!(
            "changes feed still truncated after {MAX_PAGES} pages"
        )))
    }
}

impl KeepSource for KeepClient {
    async fn list_items(&self, filter: &ItemFilter) -> Result<Vec<SourceItem>, SourceError> {
        let tree = self.sync_all().await?;
        let items: Vec<SourceItem> = tree
            .items()
            .into_iter()
            .filter(|item| filter.matches(item))
            .collect();
        tracing::info!(
            nodes = tree.node_count(),
            items = items.len(),
            "listed Keep items"
        );
        Ok(items)
    }

    async fn fetch_media(&self, attachment: &AttachmentRef) -> Result<MediaPayload, MediaError> {
        self.download(attachment)
            .await
            .map_err(|e| MediaError::Fetch {
                locator: attachment.source_locator.clone(),
                reason: e.to_string(),
            })
    }
}

fn client_timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// `s--{unix millis}--{random}`, constant for one listing.
fn client_session_id() -> Result<String, KeepError> {
    let mut buf = [0u8; 4];
    getrandom::fill(&mut buf).map_err(|e| KeepError::Random(e.to_string()))?;
    let random = u32::from_le_bytes(buf) % 9_000_000 + 1_000_000;
    Ok(format!(
        "s--{}--{random}",
        chrono::Utc::now().timestamp_millis()
    ))
}
