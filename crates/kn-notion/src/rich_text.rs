//! Rich-text rendering.
//!
//! Notion caps a single rich-text object at 2000 characters, so long text is
//! split into consecutive runs. Bare `http(s)://` URLs become link runs.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Value, json};

/// Maximum characters in one rich-text run.
pub const MAX_RUN_CHARS: usize = 2000;

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"')\]]+"#).expect("url pattern is valid"));

/// Render `text` as a rich-text array.
#[must_use]
pub fn rich_text(text: &str) -> Vec<Value> {
    let mut runs = Vec::new();
    let mut last = 0;
    for found in URL.find_iter(text) {
        push_runs(&mut runs, &text[last..found.start()], None);
        push_runs(&mut runs, found.as_str(), Some(found.as_str()));
        last = found.end();
    }
    push_runs(&mut runs, &text[last..], None);
    runs
}

fn push_runs(runs: &mut Vec<Value>, text: &str, link: Option<&str>) {
    // Over-long URLs cannot be link targets; keep them as plain text.
    let link = link.filter(|url| url.chars().count() <= MAX_RUN_CHARS);
    for chunk in split_chars(text, MAX_RUN_CHARS) {
        runs.push(match link {
            Some(url) => json!({
                "type": "text",
                "text": { "content": chunk, "link": { "url": url } }
            }),
            None => json!({ "type": "text", "text": { "content": chunk } }),
        });
    }
}

/// Split on character boundaries into pieces of at most `max` characters.
fn split_chars(text: &str, max: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (idx, _) in text.char_indices() {
        if count == max {
            pieces.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn contents(runs: &[Value]) -> Vec<&str> {
        runs.iter()
            .map(|r| r["text"]["content"].as_str().unwrap_or_default())
            .collect()
    }

    #[test]
    fn empty_text_renders_no_runs() {
        assert!(rich_text("").is_empty());
    }

    #[test]
    fn plain_text_is_one_run() {
        let runs = rich_text("buy milk");
        assert_eq!(contents(&runs), vec!["buy milk"]);
        assert!(runs[0]["text"].get("link").is_none());
    }

    #[test]
    fn urls_become_link_runs() {
        let runs = rich_text("see https://example.com/lisbon for dates");
        assert_eq!(
            contents(&runs),
            vec!["see ", "https://example.com/lisbon", " for dates"]
        );
        assert_eq!(
            runs[1]["text"]["link"]["url"],
            "https://example.com/lisbon"
        );
    }

    #[test]
    fn long_text_splits_at_the_run_limit() {
        let text = "é".repeat(MAX_RUN_CHARS * 2 + 5);
        let runs = rich_text(&text);
        let lengths: Vec<usize> = contents(&runs).iter().map(|c| c.chars().count()).collect();
        assert_eq!(lengths, vec![MAX_RUN_CHARS, MAX_RUN_CHARS, 5]);
        assert_eq!(contents(&runs).concat(), text);
    }
}
