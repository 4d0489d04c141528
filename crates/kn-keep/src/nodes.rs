//! Wire types for the Keep changes feed.
//!
//! Only the fields the importer reads are modeled; everything else in a node
//! is ignored by serde.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level `parentId` of notes and lists.
pub const ROOT_PARENT: &str = "root";

/// One page of the changes feed.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangesResponse {
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    pub to_version: Option<String>,
    #[serde(default)]
    pub truncated: bool,
    pub user_info: Option<UserInfo>,
    pub error: Option<ApiErrorBody>,
}

/// Error object Keep may embed in a 200 response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub labels: Vec<RawLabel>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLabel {
    pub main_id: String,
    pub name: String,
    #[serde(default)]
    pub timestamps: Timestamps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Note,
    List,
    ListItem,
    Blob,
}

/// Node lifecycle timestamps. Unset values arrive as the Unix epoch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Timestamps {
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub trashed: Option<DateTime<Utc>>,
    pub deleted: Option<DateTime<Utc>>,
}

impl Timestamps {
    /// Trashed or deleted at any point after the epoch.
    #[must_use]
    pub fn is_removed(&self) -> bool {
        is_set(self.trashed) || is_set(self.deleted)
    }
}

fn is_set(ts: Option<DateTime<Utc>>) -> bool {
    ts.is_some_and(|t| t.timestamp() > 0)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelLink {
    pub label_id: String,
    pub deleted: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlobType {
    Image,
    Audio,
    Drawing,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingInfo {
    pub drawing_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlob {
    #[serde(rename = "type")]
    pub blob_type: BlobType,
    pub mimetype: Option<String>,
    pub drawing_info: Option<DrawingInfo>,
}

/// A node of any type as it appears in the feed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNode {
    pub id: String,
    pub server_id: Option<String>,
    pub parent_id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub checked: bool,
    /// Parent entry of an indented list entry.
    pub super_list_item_id: Option<String>,
    /// Integer sent as a JSON string or number depending on client version.
    pub sort_value: Option<serde_json::Value>,
    #[serde(default)]
    pub timestamps: Timestamps,
    #[serde(default)]
    pub label_ids: Vec<LabelLink>,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_pinned: bool,
    pub blob: Option<RawBlob>,
}

impl RawNode {
    #[must_use]
    pub fn sort_key(&self) -> i64 {
        match &self.sort_value {
            Some(serde_json::Value::Number(n)) => n.as_i64().unwrap_or_default(),
            Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or_default(),
            _ => 0,
        }
    }

    #[must_use]
    pub fn is_top_level(&self) -> bool {
        self.parent_id == ROOT_PARENT
    }
}

/// Body of a changes-feed request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangesRequest {
    pub nodes: Vec<serde_json::Value>,
    pub client_timestamp: String,
    pub request_header: RequestHeader,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_version: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestHeader {
    pub client_session_id: String,
    pub client_platform: &'static str,
    pub client_version: ClientVersion,
    pub capabilities: Vec<Capability>,
}

#[derive(Debug, Serialize)]
pub struct ClientVersion {
    pub major: &'static str,
    pub minor: &'static str,
    pub build: &'static str,
    pub revision: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Capability {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

/// Feature flags the Android client advertises.
const CAPABILITIES: [&str; 11] = [
    "NC", "PI", "LB", "AN", "SH", "DR", "TR", "IN", "SNB", "MI", "CO",
];

impl RequestHeader {
    #[must_use]
    pub fn android(client_session_id: String) -> Self {
        Self {
            client_session_id,
            client_platform: "ANDROID",
            client_version: ClientVersion {
                major: "9",
                minor: "9",
                build: "9",
                revision: "9",
            },
            capabilities: CAPABILITIES
                .iter()
                .map(|&kind| Capability { kind })
                .collect(),
        }
    }
}
