//! Serde roundtrip and JsonSchema validation tests for entity and report types.

use std::collections::BTreeSet;

use chrono::Utc;
use kn_core::entities::*;
use kn_core::enums::*;
use kn_core::ids::{ContainerId, PageId};
use kn_core::report::*;
use schemars::schema_for;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

roundtrip_and_validate!(
    list_item_roundtrip,
    SourceItem,
    SourceItem {
        id: "1645a3f8b2c.9f1e2d3c4b5a6978".into(),
        title: "Groceries".into(),
        content: ItemContent::List {
            entries: vec![ListEntry::new("milk", false), ListEntry::new("eggs", true)],
        },
        labels: BTreeSet::from([LabelRef::new("shopping")]),
        attachments: vec![AttachmentRef {
            source_locator: "srv-note/srv-blob".into(),
            mime_kind: MediaKind::Image,
            mime_type: Some("image/jpeg".into()),
        }],
        archived: false,
        pinned: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    plan_roundtrip,
    TargetPlan,
    TargetPlan {
        source_id: "abc".into(),
        title: "Trip".into(),
        blocks: vec![
            Block::paragraph("pack bags"),
            Block::Media(MediaBlock {
                attachment: AttachmentRef {
                    source_locator: "n/b".into(),
                    mime_kind: MediaKind::Audio,
                    mime_type: None,
                },
                uploaded: Some(UploadedReference {
                    upload_id: "up-1".into(),
                    kind: MediaKind::Audio,
                }),
            }),
        ],
        parent_container_ids: BTreeSet::from([ContainerId::new("c-1")]),
    }
);

roundtrip_and_validate!(
    run_result_roundtrip,
    RunResult,
    RunResult {
        processed: 2,
        imported: 1,
        skipped: 0,
        failed: vec![ItemNote {
            item_id: "b".into(),
            reason: "link_page failed: rate limited, retry after 60s".into(),
        }],
        warnings: Vec::new(),
        outcomes: vec![ItemReport {
            item_id: "a".into(),
            title: "A".into(),
            kind: ItemKind::Note,
            state: ItemState::Committed,
            page_id: Some(PageId::new("p-1")),
            reason: None,
            notes: Vec::new(),
        }],
        started_at: Utc::now(),
        finished_at: Utc::now(),
    }
);
