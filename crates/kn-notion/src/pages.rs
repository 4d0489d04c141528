//! Page endpoints: create, find by title, append children, link.

use kn_core::entities::Block;
use kn_core::errors::TargetError;
use kn_core::ids::{ContainerId, PageId};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::NotionClient;
use crate::blocks::{link_to_page, render_all};
use crate::http::{decode, send_with_retry};
use crate::rich_text::rich_text;

/// Notion accepts at most this many children per append request.
pub const MAX_BLOCKS_PER_APPEND: usize = 100;

#[derive(Debug, Deserialize)]
struct CreatedPage {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ChildrenPage {
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    has_more: bool,
    next_cursor: Option<String>,
}

impl NotionClient {
    pub(crate) async fn create_page_under(
        &self,
        parent: &ContainerId,
        title: &str,
    ) -> Result<PageId, TargetError> {
        let body = create_page_body(parent.as_str(), title);
        let resp = send_with_retry(self.max_retries, || {
            Ok(self.request(reqwest::Method::POST, "/pages").json(&body))
        })
        .await?;
        let page: CreatedPage = decode(resp).await?;
        tracing::debug!(parent = %parent, title, page_id = %page.id, "created page");
        Ok(PageId::new(page.id))
    }

    pub(crate) async fn find_child_pages_titled(
        &self,
        parent: &ContainerId,
        title: &str,
    ) -> Result<Vec<ContainerId>, TargetError> {
        let mut found = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let mut path = format!("/blocks/{}/children?page_size=100", parent.as_str());
            if let Some(next) = &cursor {
                path.push_str("&start_cursor=");
                path.push_str(&urlencoding::encode(next));
            }
            let resp = send_with_retry(self.max_retries, || {
                Ok(self.request(reqwest::Method::GET, &path))
            })
            .await?;
            let page: ChildrenPage = decode(resp).await?;

            found.extend(
                matching_child_pages(&page.results, title)
                    .into_iter()
                    .map(ContainerId::new),
            );
            match (page.has_more, page.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => return Ok(found),
            }
        }
    }

    pub(crate) async fn append_children(
        &self,
        page: &PageId,
        blocks: &[Block],
    ) -> Result<(), TargetError> {
        let rendered = render_all(blocks)?;
        let path = format!("/blocks/{}/children", page.as_str());
        for chunk in rendered.chunks(MAX_BLOCKS_PER_APPEND) {
            let body = json!({ "children": chunk });
            send_with_retry(self.max_retries, || {
                Ok(self.request(reqwest::Method::PATCH, &path).json(&body))
            })
            .await?;
        }
        tracing::debug!(page = %page, blocks = blocks.len(), "appended blocks");
        Ok(())
    }

    pub(crate) async fn append_link(
        &self,
        container: &ContainerId,
        page: &PageId,
    ) -> Result<(), TargetError> {
        let body = json!({ "children": [link_to_page(page.as_str())] });
        let path = format!("/blocks/{}/children", container.as_str());
        send_with_retry(self.max_retries, || {
            Ok(self.request(reqwest::Method::PATCH, &path).json(&body))
        })
        .await?;
        Ok(())
    }
}

fn create_page_body(parent_id: &str, title: &str) -> Value {
    json!({
        "parent": { "type": "page_id", "page_id": parent_id },
        "properties": {
            "title": { "title": rich_text(title) }
        }
    })
}

/// Ids of the live `child_page` blocks whose title equals `title` exactly.
fn matching_child_pages(results: &[Value], title: &str) -> Vec<String> {
    results
        .iter()
        .filter(|block| block.get("type").and_then(Value::as_str) == Some("child_page"))
        .filter(|block| !flag(block, "archived") && !flag(block, "in_trash"))
        .filter(|block| {
            block
                .get("child_page")
                .and_then(|c| c.get("title"))
                .and_then(Value::as_str)
                == Some(title)
        })
        .filter_map(|block| block.get("id").and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}

fn flag(block: &Value, key: &str) -> bool {
    block.get(key).and_then(Value::as_bool).unwrap_or(false)
}
