//! Entity mapper: one `SourceItem` in, one `TargetPlan` out.
//!
//! Pure and deterministic. Container ids are resolved beforehand and passed
//! in through [`ItemContainers`], so mapping never touches the network.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use kn_core::entities::{Block, ItemContent, MediaBlock, SourceItem, TargetPlan};
use kn_core::errors::MappingError;
use kn_core::ids::ContainerId;
use regex::Regex;

static NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s+(.+)").expect("numbered pattern is valid"));
static BULLETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[*-]\s+(.+)").expect("bulleted pattern is valid"));
static QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^>\s+(.+)").expect("quote pattern is valid"));

/// Containers already resolved for one item's labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemContainers {
    /// Label name to container.
    pub by_label: BTreeMap<String, ContainerId>,
    /// Parent used when the item has no labels.
    pub fallback: ContainerId,
}

impl ItemContainers {
    #[must_use]
    pub const fn unlabeled(fallback: ContainerId) -> Self {
        Self {
            by_label: BTreeMap::new(),
            fallback,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EntityMapper {
    parse_note_markup: bool,
}

impl EntityMapper {
    #[must_use]
    pub const fn new(parse_note_markup: bool) -> Self {
        Self { parse_note_markup }
    }

    /// Build the destination plan for `item`.
    ///
    /// Block order: note body or list entries first, then one media
    /// placeholder per attachment.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::UnresolvedLabel`] if one of the item's labels
    /// has no entry in `containers`.
    pub fn map(
        &self,
        item: &SourceItem,
        containers: &ItemContainers,
    ) -> Result<TargetPlan, MappingError> {
        let mut blocks = match &item.content {
            ItemContent::Note { body } => self.note_blocks(body),
            ItemContent::List { entries } => entries
                .iter()
                .map(|entry| Block::checklist_item(entry.text.clone(), entry.checked))
                .collect(),
        };
        blocks.extend(
            item.attachments
                .iter()
                .cloned()
                .map(|attachment| Block::Media(MediaBlock::pending(attachment))),
        );

        let parent_container_ids = if item.labels.is_empty() {
            BTreeSet::from([containers.fallback.clone()])
        } else {
            item.labels
                .iter()
                .map(|label| {
                    containers
                        .by_label
                        .get(&label.name)
                        .cloned()
                        .ok_or_else(|| MappingError::UnresolvedLabel(label.name.clone()))
                })
                .collect::<Result<_, _>>()?
        };

        Ok(TargetPlan {
            source_id: item.id.clone(),
            title: item.title.clone(),
            blocks,
            parent_container_ids,
        })
    }

    fn note_blocks(&self, body: &str) -> Vec<Block> {
        if body.is_empty() {
            return Vec::new();
        }
        if self.parse_note_markup {
            body.lines().map(parse_line).collect()
        } else {
            vec![Block::paragraph(body)]
        }
    }
}

/// Classify one note line: `1. x` numbered, `- x`/`* x` bulleted, `> x` quote,
/// anything else a paragraph.
#[must_use]
pub fn parse_line(line: &str) -> Block {
    let capture = |re: &Regex| {
        re.captures(line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    };
    if let Some(text) = capture(&NUMBERED) {
        Block::NumberedListItem { text }
    } else if let Some(text) = capture(&BULLETED) {
        Block::BulletedListItem { text }
    } else if let Some(text) = capture(&QUOTE) {
        Block::Quote { text }
    } else {
        Block::paragraph(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kn_core::entities::{AttachmentRef, LabelRef, ListEntry};
    use kn_core::enums::MediaKind;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn item(content: ItemContent, labels: &[&str]) -> SourceItem {
        SourceItem {
            id: "item-1".into(),
            title: "Title".into(),
            content,
            labels: labels.iter().map(|name| LabelRef::new(*name)).collect(),
            attachments: Vec::new(),
            archived: false,
            pinned: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn root() -> ItemContainers {
        ItemContainers::unlabeled(ContainerId::new("root"))
    }

    fn attachment(locator: &str) -> AttachmentRef {
        AttachmentRef {
            source_locator: locator.into(),
            mime_kind: MediaKind::Image,
            mime_type: None,
        }
    }

    #[test]
    fn note_body_becomes_one_paragraph() {
        let plan = EntityMapper::default()
            .map(
                &item(
                    ItemContent::Note {
                        body: "line one\n- line two".into(),
                    },
                    &[],
                ),
                &root(),
            )
            .unwrap();
        assert_eq!(plan.blocks, vec![Block::paragraph("line one\n- line two")]);
        assert_eq!(
            plan.parent_container_ids,
            BTreeSet::from([ContainerId::new("root")])
        );
    }

    #[test]
    fn empty_note_is_a_title_only_plan() {
        let plan = EntityMapper::default()
            .map(&item(ItemContent::Note { body: String::new() }, &[]), &root())
            .unwrap();
        assert!(plan.blocks.is_empty());
        assert_eq!(plan.title, "Title");
    }

    #[test]
    fn empty_list_has_no_checklist_blocks() {
        let plan = EntityMapper::default()
            .map(
                &item(ItemContent::List { entries: Vec::new() }, &[]),
                &root(),
            )
            .unwrap();
        assert!(plan.checklist_items().is_empty());
        assert_eq!(plan.title, "Title");
    }

    #[test]
    fn list_entries_keep_order_and_checked_state() {
        let entries = vec![
            ListEntry::new("milk", false),
            ListEntry::new("eggs", true),
            ListEntry::new("bread", false),
        ];
        let plan = EntityMapper::default()
            .map(&item(ItemContent::List { entries }, &[]), &root())
            .unwrap();
        assert_eq!(
            plan.checklist_items(),
            vec![("milk", false), ("eggs", true), ("bread", false)]
        );
    }

    #[test]
    fn attachments_trail_the_content_in_order() {
        let mut source = item(ItemContent::Note { body: "text".into() }, &[]);
        source.attachments = vec![attachment("n/a"), attachment("n/b")];

        let plan = EntityMapper::default().map(&source, &root()).unwrap();
        assert_eq!(plan.blocks.len(), 3);
        assert_eq!(plan.blocks[0], Block::paragraph("text"));
        assert_eq!(
            plan.blocks[1],
            Block::Media(MediaBlock::pending(attachment("n/a")))
        );
        assert_eq!(
            plan.blocks[2],
            Block::Media(MediaBlock::pending(attachment("n/b")))
        );
    }

    #[test]
    fn labels_map_to_their_containers() {
        let containers = ItemContainers {
            by_label: BTreeMap::from([
                ("work".to_string(), ContainerId::new("c-work")),
                ("home".to_string(), ContainerId::new("c-home")),
            ]),
            fallback: ContainerId::new("root"),
        };
        let plan = EntityMapper::default()
            .map(
                &item(ItemContent::Note { body: "x".into() }, &["work", "home"]),
                &containers,
            )
            .unwrap();
        assert_eq!(
            plan.parent_container_ids,
            BTreeSet::from([ContainerId::new("c-home"), ContainerId::new("c-work")])
        );
    }

    #[test]
    fn unresolved_label_is_a_structural_error() {
        let err = EntityMapper::default()
            .map(&item(ItemContent::Note { body: "x".into() }, &["work"]), &root())
            .unwrap_err();
        assert!(matches!(err, MappingError::UnresolvedLabel(ref name) if name == "work"));
    }

    #[test]
    fn markup_mode_splits_lines_into_typed_blocks() {
        let plan = EntityMapper::new(true)
            .map(
                &item(
                    ItemContent::Note {
                        body: "Plan\n1. book flights\n- pack\n> carpe diem\n\nend".into(),
                    },
                    &[],
                ),
                &root(),
            )
            .unwrap();
        assert_eq!(
            plan.blocks,
            vec![
                Block::paragraph("Plan"),
                Block::NumberedListItem {
                    text: "book flights".into()
                },
                Block::BulletedListItem {
                    text: "pack".into()
                },
                Block::Quote {
                    text: "carpe diem".into()
                },
                Block::paragraph(""),
                Block::paragraph("end"),
            ]
        );
    }

    #[rstest]
    #[case("12. twelfth", Block::NumberedListItem { text: "twelfth".into() })]
    #[case("  * indented star", Block::BulletedListItem { text: "indented star".into() })]
    #[case("-no space", Block::paragraph("-no space"))]
    #[case(">no space", Block::paragraph(">no space"))]
    #[case("1.5 kg flour", Block::paragraph("1.5 kg flour"))]
    fn parse_line_cases(#[case] line: &str, #[case] want: Block) {
        assert_eq!(parse_line(line), want);
    }
}
