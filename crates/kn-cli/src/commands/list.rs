use anyhow::Context;
use kn_config::KnConfig;
use kn_core::backend::KeepSource;
use kn_core::entities::SourceItem;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ListArgs;
use crate::output::output;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct ListedItem {
    id: String,
    title: String,
    kind: String,
    labels: Vec<String>,
    attachments: usize,
    pinned: bool,
    archived: bool,
    updated_at: String,
}

impl From<&SourceItem> for ListedItem {
    fn from(item: &SourceItem) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            kind: item.kind().as_str().to_string(),
            labels: item.labels.iter().map(|label| label.name.clone()).collect(),
            attachments: item.attachments.len(),
            pinned: item.pinned,
            archived: item.archived,
            updated_at: item.updated_at.to_rfc3339(),
        }
    }
}

pub async fn handle(args: &ListArgs, flags: &GlobalFlags, config: &KnConfig) -> anyhow::Result<()> {
    let source = super::connect_keep(config).await?;
    let filter = args.filter.to_filter();

    let spinner = Progress::spinner("listing Keep items");
    let items = source.list_items(&filter).await;
    spinner.finish_clear();
    let items = items.context("failed to list Keep items")?;

    tracing::debug!(count = items.len(), "listed items");
    let rows = items.iter().map(ListedItem::from).collect::<Vec<_>>();
    output(&rows, flags.format)
}
