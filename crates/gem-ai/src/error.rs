//! Translation error types.

use thiserror::Error;

/// Errors from the natural-language-to-SQL adapter.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// No API key is configured. Checked before any request is made.
    #[error(
        "AI features are disabled: no API key configured (set GEMINI_API_KEY or QUERYGEM_AI__API_KEY)"
    )]
    NotConfigured,

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the service.
        status: u16,
        /// Error message from the service, or the raw body.
        message: String,
    },

    /// The service answered without any generated text.
    #[error("the model returned no SQL text")]
    EmptyResponse,
}

impl TranslateError {
    /// Whether this is a configuration problem rather than a failed call.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::NotConfigured)
    }
}
