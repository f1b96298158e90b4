//! Gemini `generateContent` client.

use gem_config::AiConfig;
use gem_core::Schema;
use serde::{Deserialize, Serialize};

use crate::error::TranslateError;
use crate::http::check_response;
use crate::prompt::{build_prompt, strip_code_fences};
use crate::SqlTranslator;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate, all parts joined.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// HTTP client for the Gemini text-generation API.
///
/// One request per [`GeminiClient::generate_sql`] call; no retries and no
/// request timeout.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiClient {
    /// Build a client from the `[ai]` config section.
    ///
    /// A missing API key is not an error here; [`GeminiClient::generate_sql`]
    /// reports it before making any request.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &AiConfig) -> Result<Self, TranslateError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("querygem/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            api_key: config.api_key.trim().to_string(),
            model: config.model.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        )
    }

    /// Translate `question` into SQL for `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError::NotConfigured`] without touching the network
    /// when no API key is set, and [`TranslateError::Http`],
    /// [`TranslateError::Api`] or [`TranslateError::EmptyResponse`] when the
    /// call fails.
    pub async fn generate_sql(&self, schema: &Schema, question: &str) -> Result<String, TranslateError> {
        if self.api_key.is_empty() {
            return Err(TranslateError::NotConfigured);
        }

        let prompt = build_prompt(schema, question);
        let request = GenerateRequest {
            contents: [RequestContent {
                role: "user",
                parts: [RequestPart { text: &prompt }],
            }],
        };

        tracing::debug!(model = %self.model, tables = schema.len(), "requesting SQL translation");
        let resp = self
            .http
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;
        let resp = check_response(resp).await?;

        let data: GenerateResponse = resp.json().await?;
        let raw = data.into_text().ok_or(TranslateError::EmptyResponse)?;
        let sql = strip_code_fences(&raw);
        if sql.is_empty() {
            return Err(TranslateError::EmptyResponse);
        }

        tracing::debug!(chars = sql.len(), "translation received");
        Ok(sql)
    }
}

impl SqlTranslator for GeminiClient {
    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn translate(&self, schema: &Schema, question: &str) -> Result<String, TranslateError> {
        self.generate_sql(schema, question).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_candidate_text() {
        let body = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "```sql\n"}, {"text": "SELECT 1;\n```"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }"#;
        let data: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(data.into_text().as_deref(), Some("```sql\nSELECT 1;\n```"));
    }

    #[test]
    fn no_candidates_is_empty() {
        let data: GenerateResponse = serde_json::from_str(r#"{"promptFeedback": {}}"#).unwrap();
        assert!(data.into_text().is_none());

        let data: GenerateResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();
        assert!(data.into_text().is_none());
    }

    #[test]
    fn request_shape() {
        let request = GenerateRequest {
            contents: [RequestContent {
                role: "user",
                parts: [RequestPart { text: "hi" }],
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["contents"][0]["role"], "user");
    }

    #[test]
    fn url_joins_endpoint_and_model() {
        let client = GeminiClient::new(&AiConfig {
            endpoint: "http://localhost:8080/".into(),
            model: "gemini-test".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            client.url(),
            "http://localhost:8080/v1beta/models/gemini-test:generateContent"
        );
        assert!(!client.is_configured());
    }
}
