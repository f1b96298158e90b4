//! Shared HTTP response checks.
//!
//! Non-success statuses become [`TranslateError::Api`]. The message is taken
//! from the Google-style `{"error": {"message": ...}}` body when present,
//! otherwise the raw body is used.

use serde::Deserialize;

use crate::error::TranslateError;

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Return the response unchanged on success, or an API error describing it.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, TranslateError> {
    if resp.status().is_success() {
        return Ok(resp);
    }

    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    Err(TranslateError::Api {
        status,
        message: error_message(&body),
    })
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map_or_else(|_| body.trim().to_string(), |envelope| envelope.error.message)
}
