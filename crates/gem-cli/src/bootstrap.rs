use anyhow::Context;
use gem_ai::GeminiClient;
use gem_config::GemConfig;
use gem_session::{Session, SessionOptions};

use crate::config_warnings;

/// Load `.env`, then the layered configuration.
pub fn load_config() -> anyhow::Result<GemConfig> {
    let config = GemConfig::load_with_dotenv().context("failed to load QueryGem configuration")?;
    config_warnings::warn_unconfigured(&config);
    Ok(config)
}

/// A session wired to the Gemini translator from `config`.
pub fn session(config: &GemConfig) -> anyhow::Result<Session<GeminiClient>> {
    let client = GeminiClient::new(&config.ai).context("failed to build the AI client")?;
    if config.ai.is_configured() {
        tracing::debug!(model = %client.model(), "AI translation enabled");
    }
    Ok(Session::new(client, SessionOptions::from_config(config)))
}
