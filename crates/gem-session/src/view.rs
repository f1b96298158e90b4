//! Snapshots of session state for rendering.

use std::sync::Arc;

use gem_core::defaults::PLACEHOLDER_QUERY;
use gem_core::{QueryResult, Schema};

use crate::error::SessionError;

/// Result of the last query, or the error that replaced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Arc<QueryResult>),
    Failure(SessionError),
}

/// Everything a presentation layer needs to draw the current state.
///
/// Published after every transition; cheap to clone.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub connected: bool,
    /// Shown as "Connected to: ..." while a database is active.
    pub file_name: Option<String>,
    pub schema: Option<Arc<Schema>>,
    /// Editor buffer.
    pub query_text: String,
    pub outcome: Option<Outcome>,
    pub is_loading_database: bool,
    pub is_executing_query: bool,
    pub is_translating: bool,
    pub sidebar_open: bool,
    pub ai_available: bool,
}

impl SessionView {
    /// State before any load and after a disconnect.
    #[must_use]
    pub fn initial(ai_available: bool) -> Self {
        Self {
            connected: false,
            file_name: None,
            schema: None,
            query_text: PLACEHOLDER_QUERY.to_string(),
            outcome: None,
            is_loading_database: false,
            is_executing_query: false,
            is_translating: false,
            sidebar_open: false,
            ai_available,
        }
    }

    #[must_use]
    pub fn last_result(&self) -> Option<&QueryResult> {
        match &self.outcome {
            Some(Outcome::Success(result)) => Some(result),
            _ => None,
        }
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&SessionError> {
        match &self.outcome {
            Some(Outcome::Failure(error)) => Some(error),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.is_loading_database || self.is_executing_query || self.is_translating
    }

    /// Whether the natural-language prompt accepts input right now.
    #[must_use]
    pub const fn can_ask(&self) -> bool {
        self.connected && self.ai_available && !self.is_translating
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_view_has_placeholder_and_nothing_loaded() {
        let view = SessionView::initial(false);
        assert_eq!(view.query_text, PLACEHOLDER_QUERY);
        assert!(!view.connected);
        assert!(view.outcome.is_none());
        assert!(!view.is_busy());
        assert!(!view.can_ask());
    }

    #[test]
    fn outcome_accessors_are_exclusive() {
        let mut view = SessionView::initial(true);
        view.outcome = Some(Outcome::Failure(SessionError::NoDatabase));
        assert!(view.last_error().is_some());
        assert!(view.last_result().is_none());

        view.outcome = Some(Outcome::Success(Arc::new(QueryResult::default())));
        assert!(view.last_error().is_none());
        assert!(view.last_result().is_some_and(QueryResult::is_empty));
    }
}
