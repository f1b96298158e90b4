//! Editor text and notices shown by the workflow.

/// Editor text before any database is loaded, and after a disconnect.
pub const PLACEHOLDER_QUERY: &str = "SELECT * FROM your_table_name LIMIT 10;";

/// Editor text when a database loaded but has no user tables. A comment only,
/// so running it executes nothing.
pub const NO_TABLES_QUERY: &str =
    "-- No tables found. Please see the message in the results panel.";

/// Guidance shown when a valid database reports zero user tables.
pub const WAL_GUIDANCE: &str = "Database loaded, but no tables were found.\n\n\
This is a common issue with SQLite's Write-Ahead Logging (WAL) mode. If another \
application (like a Python script or database browser) has the database open, \
recent changes might not be in the main .db file yet.\n\n\
Solution: Please ensure all other programs connected to this database are fully \
closed. This will commit all changes, making the tables visible here.";

/// File extensions offered by the file picker. A hint only, never enforced.
pub const DATABASE_EXTENSIONS: [&str; 3] = ["db", "sqlite", "sqlite3"];

/// `SELECT * FROM <table> LIMIT 10;` for the first table of a fresh schema.
#[must_use]
pub fn default_query_for(table: &str) -> String {
    format!("SELECT * FROM {table} LIMIT 10;")
}
