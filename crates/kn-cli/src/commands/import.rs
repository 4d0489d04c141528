use anyhow::Context;
use kn_config::KnConfig;
use kn_core::report::{ItemNote, RunResult};
use kn_notion::NotionClient;
use kn_sync::{ImportLedger, ImportOptions, Orchestrator};

use crate::cli::root_commands::ImportArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::output;
use crate::progress::ImportProgress;

pub async fn handle(
    args: &ImportArgs,
    flags: &GlobalFlags,
    config: &KnConfig,
) -> anyhow::Result<()> {
    config.validate_for_import()?;
    let options = ImportOptions::from_config(config)?;
    let ledger = open_ledger(config, args.reimport)?;

    let source = super::connect_keep(config).await?;
    let target = NotionClient::new(
        &config.notion.token,
        config.notion.timeout_secs,
        config.notion.max_retries,
    )
    .context("failed to create Notion client")?;

    let filter = args.filter.to_filter();
    tracing::info!(
        root = %options.root,
        query = ?filter.query,
        labels = ?filter.labels,
        ledger = ledger.is_enabled(),
        "import configured"
    );

    let progress = ImportProgress::default();
    let mut orchestrator = Orchestrator::new(&source, &target, options, ledger);
    let result = orchestrator
        .run(&filter, &progress)
        .await
        .context("import aborted before any item was written")?;

    print_result(&result, flags.format)
}

/// Open the import ledger according to `import.use_ledger` and `--reimport`.
///
/// `--reimport` ignores earlier entries but still records this run.
fn open_ledger(config: &KnConfig, reimport: bool) -> anyhow::Result<ImportLedger> {
    if !config.import.use_ledger {
        return Ok(ImportLedger::disabled());
    }
    let path = config.import.ledger_path.trim();
    if path.is_empty() {
        return Ok(ImportLedger::disabled());
    }
    ImportLedger::open(path, !reimport).with_context(|| format!("failed to open ledger {path}"))
}

/// JSON formats print the whole report; the table format prints the counts,
/// then one table each for failures and warnings when present.
fn print_result(result: &RunResult, format: OutputFormat) -> anyhow::Result<()> {
    if format != OutputFormat::Table {
        return output(result, format);
    }

    output(&result.summary(), format)?;
    print_notes("failed items", &result.failed, format)?;
    print_notes("warnings", &result.warnings, format)
}

fn print_notes(heading: &str, notes: &[ItemNote], format: OutputFormat) -> anyhow::Result<()> {
    if notes.is_empty() {
        return Ok(());
    }
    println!("\n{heading}:");
    output(&notes, format)
}
