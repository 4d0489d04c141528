//! Normalization of a recorded changes-feed page.

use std::collections::BTreeSet;

use kn_core::entities::{ItemContent, ListEntry, SourceItem};
use kn_core::enums::{ItemKind, MediaKind};
use kn_core::filter::ItemFilter;
use kn_keep::nodes::ChangesResponse;
use kn_keep::tree::NodeTree;
use pretty_assertions::assert_eq;

const FIXTURE: &str = include_str!("fixtures/changes_page.json");

fn items() -> Vec<SourceItem> {
    let page: ChangesResponse = serde_json::from_str(FIXTURE).expect("fixture should parse");
    assert!(!page.truncated);
    assert_eq!(page.to_version.as_deref(), Some("v-2"));

    let mut tree = NodeTree::default();
    tree.merge_nodes(page.nodes);
    tree.merge_labels(page.user_info.expect("fixture has userInfo").labels);
    tree.items()
}

#[test]
fn live_top_level_nodes_become_items_in_feed_order() {
    let items = items();
    let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["Groceries", "Trip ideas"]);
}

#[test]
fn list_is_normalized_with_entries_and_labels() {
    let items = items();
    let groceries = &items[0];
    assert_eq!(groceries.kind(), ItemKind::List);
    assert_eq!(groceries.id, "1645a3f8b2c.9f1e2d3c4b5a6978");
    assert!(groceries.pinned);
    assert_eq!(
        groceries.content,
        ItemContent::List {
            entries: vec![ListEntry::new("milk", false), ListEntry::new("eggs", true)],
        }
    );
    assert!(groceries.has_label("shopping"));
    assert_eq!(groceries.created_at.to_rfc3339(), "2024-02-01T09:00:00+00:00");
}

#[test]
fn note_carries_body_attachment_and_archive_flag() {
    let items = items();
    let trip = &items[1];
    assert_eq!(trip.kind(), ItemKind::Note);
    assert!(trip.archived);
    assert_eq!(
        trip.body_text(),
        Some("Lisbon in May\nsee https://example.com/lisbon")
    );
    assert_eq!(trip.attachments.len(), 1);
    assert_eq!(trip.attachments[0].source_locator, "srv-trip/srv-photo");
    assert_eq!(trip.attachments[0].mime_kind, MediaKind::Image);
}

#[test]
fn label_filter_selects_from_normalized_items() {
    let filter = ItemFilter::new(None, Some(BTreeSet::from(["home".to_string()])));
    let matched: Vec<String> = items()
        .into_iter()
        .filter(|i| filter.matches(i))
        .map(|i| i.title)
        .collect();
    assert_eq!(matched, vec!["Trip ideas".to_string()]);
}
