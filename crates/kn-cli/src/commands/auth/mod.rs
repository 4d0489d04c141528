mod login;
mod logout;
mod status;

use kn_config::KnConfig;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthCommands;

/// Handle `keep2notion auth <subcommand>`.
pub async fn handle(
    action: &AuthCommands,
    flags: &GlobalFlags,
    config: &KnConfig,
) -> anyhow::Result<()> {
    match action {
        AuthCommands::Login(args) => login::handle(args, flags, config).await,
        AuthCommands::Logout => logout::handle(flags, config),
        AuthCommands::Status => status::handle(flags, config),
    }
}
