use clap::{Args, Subcommand};

/// Authentication commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Verify and store a Keep master token for `keep.email`.
    Login(AuthLoginArgs),
    /// Clear stored Keep credentials.
    Logout,
    /// Show where the Keep credentials come from.
    Status,
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    /// Master token (read from stdin when omitted).
    #[arg(long)]
    pub master_token: Option<String>,
}
