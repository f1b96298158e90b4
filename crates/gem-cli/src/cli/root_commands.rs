use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Interactive session: load a file, browse, query and ask.
    Shell(ShellArgs),
    /// Print the tables and columns of a database file.
    Schema(SchemaArgs),
    /// Run SQL against a database file and print the results.
    Query(QueryArgs),
    /// Ask a question in plain language; the AI writes and runs the SQL.
    Ask(AskArgs),
}

/// Arguments for `qgem shell`.
#[derive(Clone, Debug, Args)]
pub struct ShellArgs {
    /// Database file to load on start.
    pub file: Option<PathBuf>,
}

/// Arguments for `qgem schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Database file (.db, .sqlite, .sqlite3).
    pub file: PathBuf,
}

/// Arguments for `qgem query`.
#[derive(Clone, Debug, Args)]
pub struct QueryArgs {
    /// Database file (.db, .sqlite, .sqlite3).
    pub file: PathBuf,
    /// One or more semicolon-separated statements.
    pub sql: String,
}

/// Arguments for `qgem ask`.
#[derive(Clone, Debug, Args)]
pub struct AskArgs {
    /// Database file (.db, .sqlite, .sqlite3).
    pub file: PathBuf,
    /// Question about the data.
    pub question: String,
    /// Print the generated SQL before the results.
    #[arg(long)]
    pub show_sql: bool,
}
