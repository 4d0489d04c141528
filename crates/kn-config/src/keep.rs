//! Google Keep (source side) configuration.

use serde::{Deserialize, Serialize};

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeepConfig {
    /// Google account email.
    #[serde(default)]
    pub email: String,

    /// Import plain notes.
    #[serde(default = "default_true")]
    pub import_notes: bool,

    /// Import checklists.
    #[serde(default = "default_true")]
    pub import_todos: bool,

    /// Transfer image and audio attachments.
    #[serde(default = "default_true")]
    pub import_media: bool,

    /// Device identifier sent during token exchange. Generated when empty.
    #[serde(default)]
    pub android_id: String,
}

impl Default for KeepConfig {
    fn default() -> Self {
        Self {
            email: String::new(),
            import_notes: true,
            import_todos: true,
            import_media: true,
            android_id: String::new(),
        }
    }
}

impl KeepConfig {
    pub fn is_configured(&self) -> bool {
        !self.email.trim().is_empty()
    }
}
