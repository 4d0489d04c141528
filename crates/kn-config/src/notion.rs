//! Notion (target side) configuration.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

static PAGE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://(?:www\.)?notion\.so/(?:.*?)([0-9a-f]{32})/?(?:[?#].*)?$")
        .expect("page URL pattern is valid")
});

static DASHED_UUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("uuid pattern is valid")
});

const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotionConfig {
    /// Internal integration token.
    #[serde(default)]
    pub token: String,

    /// URL (or id) of the pre-existing root page that receives the import.
    #[serde(default)]
    pub root_url: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// How many times a rate-limited request is re-sent. 0 disables retry.
    #[serde(default)]
    pub max_retries: u32,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            root_url: String::new(),
            timeout_secs: default_timeout_secs(),
            max_retries: 0,
        }
    }
}

impl NotionConfig {
    pub fn is_configured(&self) -> bool {
        !self.token.trim().is_empty() && !self.root_url.trim().is_empty()
    }

    /// Root page id in dashed UUID form.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `root_url` is not a Notion page
    /// URL, a bare 32-hex id, or a dashed UUID.
    pub fn root_page_id(&self) -> Result<String, ConfigError> {
        page_id_from_url(&self.root_url).ok_or_else(|| ConfigError::InvalidValue {
            field: "notion.root_url".into(),
            reason: format!("'{}' is not a Notion page URL or id", self.root_url),
        })
    }
}

/// Extract the page UUID from a Notion URL or raw id.
pub fn page_id_from_url(value: &str) -> Option<String> {
    let value = value.trim().to_ascii_lowercase();

    if DASHED_UUID.is_match(&value) {
        return Some(value);
    }

    let hex = if value.len() == 32 && value.chars().all(|c| c.is_ascii_hexdigit()) {
        value
    } else {
        PAGE_URL.captures(&value)?.get(1)?.as_str().to_string()
    };

    Some(format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    ))
}
