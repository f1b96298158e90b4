//! Engine error types for gem-engine.

use thiserror::Error;

/// Errors from the embedded engine adapter.
///
/// `Open` and `Query` carry the engine diagnostic as-is so callers can show it
/// to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The engine runtime could not be instantiated.
    #[error("Failed to initialize the SQL engine: {0}")]
    Init(String),

    /// The byte buffer is not a usable database image.
    #[error("{0}")]
    Open(String),

    /// A statement failed (syntax error, missing table, constraint, ...).
    #[error("{0}")]
    Query(String),

    /// The handle was closed or never opened.
    #[error("Database not loaded.")]
    Closed,
}

/// Extract the engine's own message from a libSQL error.
///
/// libSQL wraps SQLite failures as ``SQLite failure: `<message>` ``; only the
/// inner message is meaningful to a user.
pub(crate) fn engine_message(error: &libsql::Error) -> String {
    let rendered = error.to_string();
    rendered
        .strip_prefix("SQLite failure: `")
        .and_then(|rest| rest.strip_suffix('`'))
        .map_or_else(|| rendered.clone(), str::to_string)
}

pub(crate) fn query_error(error: libsql::Error) -> EngineError {
    EngineError::Query(engine_message(&error))
}

pub(crate) fn open_error(error: libsql::Error) -> EngineError {
    EngineError::Open(engine_message(&error))
}
