//! Errors surfaced by the workflow controller.

use gem_ai::TranslateError;
use gem_core::defaults::WAL_GUIDANCE;
use gem_engine::EngineError;
use thiserror::Error;

/// What the results panel shows when something went wrong.
///
/// `Display` is the exact panel text. The type is `Clone` because the same
/// error lives in every [`crate::SessionView`] snapshot published after it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The embedded engine could not be initialized.
    #[error("{0}")]
    Init(String),

    #[error("Failed to load database: {0}")]
    Open(String),

    #[error("Failed to read schema: {0}")]
    SchemaRead(String),

    /// The database loaded but reports no user tables.
    #[error("{}", WAL_GUIDANCE)]
    SchemaEmpty,

    /// Engine diagnostic from a failed statement, verbatim.
    #[error("{0}")]
    Query(String),

    /// No AI credential is configured.
    #[error("AI query failed: {0}")]
    Config(String),

    #[error("AI query failed: {0}")]
    Translation(String),

    #[error("No database loaded.")]
    NoDatabase,

    #[error("Cannot generate SQL without a database schema. Please load a valid database first.")]
    NoSchema,
}

impl SessionError {
    /// Notices that explain a state rather than report a failure.
    #[must_use]
    pub const fn is_informational(&self) -> bool {
        matches!(self, Self::SchemaEmpty)
    }
}

impl From<EngineError> for SessionError {
    /// Open-time mapping. Query-time failures use [`SessionError::Query`].
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::Init(_) => Self::Init(error.to_string()),
            EngineError::Open(message) => Self::Open(message),
            EngineError::Query(message) => Self::Query(message),
            EngineError::Closed => Self::NoDatabase,
        }
    }
}

impl From<TranslateError> for SessionError {
    fn from(error: TranslateError) -> Self {
        if error.is_config() {
            Self::Config(error.to_string())
        } else {
            Self::Translation(error.to_string())
        }
    }
}
