//! Run orchestrator: drives every filtered item through the pipeline.
//!
//! Items are processed one at a time in source order. Per-item failures are
//! recorded in the run report and never stop the run; only listing the
//! source is fatal.

use std::collections::BTreeMap;

use chrono::Utc;
use kn_config::{ConfigError, KnConfig};
use kn_core::entities::SourceItem;
use kn_core::enums::{ItemKind, ItemState, WriteStep};
use kn_core::errors::{ItemError, RunError};
use kn_core::filter::ItemFilter;
use kn_core::ids::{ContainerId, PageId};
use kn_core::report::{ItemReport, RunResult, RunTally};
use kn_core::{KeepSource, NotionTarget};

use crate::labels::LabelResolver;
use crate::ledger::{ImportLedger, LedgerEntry};
use crate::mapper::{EntityMapper, ItemContainers};
use crate::media::MediaTransfer;
use crate::writer::TargetWriter;

/// Container title for unlabeled notes when grouping by kind.
pub const NOTES_CONTAINER: &str = "Notes";
/// Container title for unlabeled lists when grouping by kind.
pub const TODOS_CONTAINER: &str = "TODOs";

/// Immutable run settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    pub root: ContainerId,
    pub import_notes: bool,
    pub import_todos: bool,
    pub import_media: bool,
    pub parse_note_markup: bool,
    pub group_unlabeled_by_kind: bool,
}

impl ImportOptions {
    /// Defaults matching an empty configuration, rooted at `root`.
    #[must_use]
    pub const fn new(root: ContainerId) -> Self {
        Self {
            root,
            import_notes: true,
            import_todos: true,
            import_media: true,
            parse_note_markup: false,
            group_unlabeled_by_kind: false,
        }
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the root URL cannot be parsed.
    pub fn from_config(config: &KnConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            root: ContainerId::new(config.notion.root_page_id()?),
            import_notes: config.keep.import_notes,
            import_todos: config.keep.import_todos,
            import_media: config.keep.import_media,
            parse_note_markup: config.import.parse_note_markup,
            group_unlabeled_by_kind: config.import.group_unlabeled_by_kind,
        })
    }
}

/// Receives progress events during a run.
pub trait ProgressObserver {
    fn on_start(&self, _total: usize) {}
    fn on_item(&self, _report: &ItemReport) {}
    fn on_finish(&self, _result: &RunResult) {}
}

/// Observer that ignores every event.
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

pub struct Orchestrator<'a, S, T> {
    source: &'a S,
    target: &'a T,
    options: ImportOptions,
    mapper: EntityMapper,
    labels: LabelResolver,
    ledger: ImportLedger,
}

impl<'a, S: KeepSource, T: NotionTarget> Orchestrator<'a, S, T> {
    #[must_use]
    pub fn new(source: &'a S, target: &'a T, options: ImportOptions, ledger: ImportLedger) -> Self {
        let mut labels = LabelResolver::new(options.root.clone());
        for page in ledger.item_pages() {
            labels.exclude_item_page(page);
        }
        Self {
            source,
            target,
            mapper: EntityMapper::new(options.parse_note_markup),
            labels,
            options,
            ledger,
        }
    }

    #[must_use]
    pub const fn labels(&self) -> &LabelResolver {
        &self.labels
    }

    #[must_use]
    pub const fn ledger(&self) -> &ImportLedger {
        &self.ledger
    }

    /// Import every item matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Source`] if the source cannot be listed. No item
    /// has been touched in that case.
    pub async fn run(
        &mut self,
        filter: &ItemFilter,
        progress: &dyn ProgressObserver,
    ) -> Result<RunResult, RunError> {
        let items = self.source.list_items(filter).await?;
        tracing::info!(items = items.len(), "starting import");
        progress.on_start(items.len());

        let mut tally = RunTally::start();
        for item in &items {
            let report = self.process(item).await;
            progress.on_item(&report);
            tally.record(report);
        }

        let result = tally.finish();
        tracing::info!(
            processed = result.processed,
            imported = result.imported,
            skipped = result.skipped,
            failed = result.failed_count(),
            "import finished"
        );
        progress.on_finish(&result);
        Ok(result)
    }

    async fn process(&mut self, item: &SourceItem) -> ItemReport {
        let mut report = ItemReport::new(&item.id, &item.title, item.kind());

        if let Some(reason) = self.skip_reason(item) {
            tracing::info!(item = %item.id, title = %item.title, reason, "skipped");
            advance(&mut report, ItemState::Skipped);
            report.reason = Some(reason.to_string());
            return report;
        }

        match self.import_item(item, &mut report).await {
            Ok(page) => {
                advance(&mut report, ItemState::Committed);
                tracing::info!(item = %item.id, title = %item.title, page = %page, "imported");
                self.remember(item, &page);
                report.page_id = Some(page);
            }
            Err(err) => {
                match &err {
                    ItemError::Structural(_) => {
                        tracing::error!(item = %item.id, %err, "structural mapping defect");
                    }
                    ItemError::TargetWrite { .. } => {
                        tracing::warn!(item = %item.id, title = %item.title, %err, "import failed");
                    }
                }
                advance(&mut report, ItemState::Failed);
                report.reason = Some(err.to_string());
            }
        }
        report
    }

    fn skip_reason(&self, item: &SourceItem) -> Option<&'static str> {
        match item.kind() {
            ItemKind::Note if !self.options.import_notes => Some("notes import disabled"),
            ItemKind::List if !self.options.import_todos => Some("lists import disabled"),
            _ if self.ledger.contains(&item.id) => Some("already imported"),
            _ => None,
        }
    }

    async fn import_item(
        &mut self,
        item: &SourceItem,
        report: &mut ItemReport,
    ) -> Result<PageId, ItemError> {
        let containers = self.containers_for(item).await?;
        let mut plan = self.mapper.map(item, &containers)?;
        advance(report, ItemState::Mapped);

        if plan.media_count() > 0 {
            if self.options.import_media {
                let notes = MediaTransfer::new(self.source, self.target)
                    .resolve_plan(&mut plan)
                    .await;
                report.notes.extend(notes);
                advance(report, ItemState::MediaResolved);
            } else {
                let dropped = plan.strip_media();
                tracing::debug!(item = %item.id, dropped, "media import disabled");
            }
        }

        let writer = TargetWriter::new(self.target, &self.options.root);
        let page = writer.create(&plan).await?;
        self.labels.exclude_item_page(&page);
        writer.fill(&page, &plan).await?;
        Ok(page)
    }

    async fn containers_for(&mut self, item: &SourceItem) -> Result<ItemContainers, ItemError> {
        let resolve_err = |e| ItemError::write(WriteStep::ResolveContainer, e);

        let fallback = match (item.labels.is_empty(), self.options.group_unlabeled_by_kind) {
            (true, true) => {
                let name = match item.kind() {
                    ItemKind::Note => NOTES_CONTAINER,
                    ItemKind::List => TODOS_CONTAINER,
                };
                self.labels
                    .resolve_name(self.target, name)
                    .await
                    .map_err(resolve_err)?
            }
            _ => self.options.root.clone(),
        };

        let mut by_label = BTreeMap::new();
        for label in &item.labels {
            let id = self
                .labels
                .resolve(self.target, label)
                .await
                .map_err(resolve_err)?;
            by_label.insert(label.name.clone(), id);
        }
        Ok(ItemContainers { by_label, fallback })
    }

    fn remember(&mut self, item: &SourceItem, page: &PageId) {
        let entry = LedgerEntry {
            source_id: item.id.clone(),
            page_id: page.clone(),
            title: item.title.clone(),
            imported_at: Utc::now(),
        };
        if let Err(err) = self.ledger.record(entry) {
            tracing::warn!(item = %item.id, %err, "could not record import in ledger");
        }
    }
}

fn advance(report: &mut ItemReport, next: ItemState) {
    if report.state.can_transition_to(next) {
        report.state = next;
    } else {
        tracing::error!(
            item = %report.item_id,
            from = %report.state,
            to = %next,
            "invalid item state transition"
        );
    }
}
