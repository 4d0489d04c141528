use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `keep2notion` binary.
#[derive(Debug, Parser)]
#[command(
    name = "keep2notion",
    version,
    about = "Migrate Google Keep notes, lists, labels and media into Notion"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Quiet mode (errors only, no progress bar)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Extra configuration file layered over the user and project files
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            config: self.config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::subcommands::AuthCommands;
    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn table_is_the_default_format() {
        let cli = Cli::try_parse_from(["keep2notion", "list"]).expect("cli should parse");
        assert_eq!(cli.format, OutputFormat::Table);
        assert!(!cli.quiet);
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "keep2notion",
            "--format",
            "json",
            "--verbose",
            "--config",
            "/tmp/kn.toml",
            "import",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Import(_)));
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(
            flags.config.as_deref(),
            Some(std::path::Path::new("/tmp/kn.toml"))
        );
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["keep2notion", "list", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::List(_)));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["keep2notion", "--format", "xml", "list"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn short_q_is_the_query_not_quiet() {
        let cli = Cli::try_parse_from(["keep2notion", "import", "-q", "milk", "-l", "home, work"])
            .expect("cli should parse");
        assert!(!cli.quiet);

        let Commands::Import(args) = cli.command else {
            panic!("expected import");
        };
        let filter = args.filter.to_filter();
        assert_eq!(filter.query.as_deref(), Some("milk"));
        assert_eq!(
            filter.labels,
            Some(BTreeSet::from(["home".to_string(), "work".to_string()]))
        );
        assert!(!args.reimport);
    }

    #[test]
    fn reimport_flag_parses() {
        let cli = Cli::try_parse_from(["keep2notion", "import", "--reimport"])
            .expect("cli should parse");
        let Commands::Import(args) = cli.command else {
            panic!("expected import");
        };
        assert!(args.reimport);
        assert!(args.filter.to_filter().is_empty());
    }

    #[test]
    fn auth_login_accepts_master_token() {
        let cli = Cli::try_parse_from(["keep2notion", "auth", "login", "--master-token", "aas_et/x"])
            .expect("cli should parse");
        let Commands::Auth { action } = cli.command else {
            panic!("expected auth");
        };
        let AuthCommands::Login(args) = action else {
            panic!("expected login");
        };
        assert_eq!(args.master_token.as_deref(), Some("aas_et/x"));
    }

    #[test]
    fn auth_status_and_logout_take_no_arguments() {
        for sub in ["status", "logout"] {
            let cli = Cli::try_parse_from(["keep2notion", "auth", sub]).expect("cli should parse");
            assert!(matches!(cli.command, Commands::Auth { .. }));
        }
    }
}
