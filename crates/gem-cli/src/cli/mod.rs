use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `qgem` binary.
#[derive(Debug, Parser)]
#[command(
    name = "qgem",
    version,
    about = "QueryGem - browse SQLite databases and ask questions in plain language"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: table, json, raw
    #[arg(short, long, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Max rows to display per result set
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Answer yes to confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            yes: self.yes,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "qgem", "--format", "json", "--limit", "10", "--verbose", "schema", "app.db",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.limit, Some(10));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Schema(ref args) if args.file == Path::new("app.db")));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["qgem", "shell", "--format", "raw", "--quiet", "--yes"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
        assert!(cli.yes);
        assert!(matches!(cli.command, Commands::Shell(ref args) if args.file.is_none()));
    }

    #[test]
    fn default_format_is_table() {
        let cli = Cli::try_parse_from(["qgem", "shell", "app.db"]).expect("cli should parse");
        assert_eq!(cli.format, OutputFormat::Table);
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["qgem", "--format", "xml", "shell"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn query_takes_file_and_sql() {
        let cli = Cli::try_parse_from(["qgem", "query", "app.db", "SELECT 1; SELECT 2"])
            .expect("cli should parse");
        let Commands::Query(args) = cli.command else {
            panic!("expected query command");
        };
        assert_eq!(args.file, Path::new("app.db"));
        assert_eq!(args.sql, "SELECT 1; SELECT 2");
    }

    #[test]
    fn ask_accepts_show_sql() {
        let cli = Cli::try_parse_from(["qgem", "ask", "app.db", "how many users?", "--show-sql"])
            .expect("cli should parse");
        let Commands::Ask(args) = cli.command else {
            panic!("expected ask command");
        };
        assert_eq!(args.question, "how many users?");
        assert!(args.show_sql);
    }

    #[test]
    fn query_requires_sql() {
        assert!(Cli::try_parse_from(["qgem", "query", "app.db"]).is_err());
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["qgem", "--yes", "--limit", "5", "shell"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert!(flags.yes);
        assert_eq!(flags.limit, Some(5));
    }
}
