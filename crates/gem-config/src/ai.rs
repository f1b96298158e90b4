//! Natural-language-to-SQL service configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AiConfig {
    /// Gemini API key. Also read from the legacy `GEMINI_API_KEY` variable.
    #[serde(default)]
    pub api_key: String,

    /// Model identifier sent with every translation request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the generative language API.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Let translated SQL modify the database. Off means translated
    /// statements run with the engine in query-only mode.
    #[serde(default)]
    pub allow_writes: bool,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            endpoint: default_endpoint(),
            allow_writes: false,
        }
    }
}

impl AiConfig {
    /// A credential is present, so the natural-language feature is usable.
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Reject values that would only fail later at request time.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an empty model or an
    /// endpoint that is not an `http(s)` URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "ai.model".to_string(),
                reason: "model identifier must not be empty".to_string(),
            });
        }
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "ai.endpoint".to_string(),
                reason: format!("expected an http(s) URL, got '{}'", self.endpoint),
            });
        }
        Ok(())
    }
}
