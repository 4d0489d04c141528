//! Import behavior configuration.

use serde::{Deserialize, Serialize};

fn default_ledger_path() -> String {
    ".keep2notion/ledger.jsonl".to_string()
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImportConfig {
    /// Split note bodies into list, quote and paragraph blocks line by line.
    #[serde(default)]
    pub parse_note_markup: bool,

    /// Place unlabeled items under "Notes"/"TODOs" containers instead of the root.
    #[serde(default)]
    pub group_unlabeled_by_kind: bool,

    /// Skip items already recorded in the import ledger.
    #[serde(default = "default_true")]
    pub use_ledger: bool,

    /// JSONL ledger of committed items.
    #[serde(default = "default_ledger_path")]
    pub ledger_path: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            parse_note_markup: false,
            group_unlabeled_by_kind: false,
            use_ledger: true,
            ledger_path: default_ledger_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = ImportConfig::default();
        assert!(!config.parse_note_markup);
        assert!(!config.group_unlabeled_by_kind);
        assert!(config.use_ledger);
        assert_eq!(config.ledger_path, ".keep2notion/ledger.jsonl");
    }
}
