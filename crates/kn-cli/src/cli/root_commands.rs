use clap::{Args, Subcommand};

use crate::cli::subcommands::{AuthCommands, FilterArgs};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Import matching Keep items into the configured Notion root page.
    Import(ImportArgs),
    /// List matching Keep items without writing anything.
    List(ListArgs),
    /// Keep credential management.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
}

#[derive(Clone, Debug, Args)]
pub struct ImportArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Import items again even if the ledger says they were already imported.
    #[arg(long)]
    pub reimport: bool,
}

#[derive(Clone, Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
}
