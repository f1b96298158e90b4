//! # gem-ai
//!
//! Natural-language-to-SQL translation for QueryGem.
//!
//! [`SqlTranslator`] is the seam the session controller depends on;
//! [`GeminiClient`] implements it against Google's Gemini
//! `generateContent` endpoint. The prompt carries the loaded schema and the
//! user's question, and the reply is cleaned of markdown fences before it is
//! handed back as SQL text.

use std::future::Future;

use gem_core::Schema;

pub mod error;
mod gemini;
mod http;
pub mod prompt;

pub use error::TranslateError;
pub use gemini::GeminiClient;

/// Turns a question about a schema into SQL text.
pub trait SqlTranslator {
    /// Whether a translation can be attempted at all.
    fn is_configured(&self) -> bool;

    /// Produce SQL for `question` against `schema`.
    ///
    /// The returned text is not validated or executed.
    fn translate(
        &self,
        schema: &Schema,
        question: &str,
    ) -> impl Future<Output = Result<String, TranslateError>> + Send;
}
