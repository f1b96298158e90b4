//! # gem-config
//!
//! Layered configuration loading for QueryGem using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`QUERYGEM_*` prefix, `__` as separator)
//! 2. Legacy `GEMINI_API_KEY` (maps to `ai.api_key`)
//! 3. Project-level `.querygem/config.toml`
//! 4. User-level `~/.config/querygem/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `QUERYGEM_AI__API_KEY` -> `ai.api_key`,
//! `QUERYGEM_GENERAL__DISPLAY_LIMIT` -> `general.display_limit`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use gem_config::GemConfig;
//!
//! let config = GemConfig::load_with_dotenv().expect("config");
//! if config.ai.is_configured() {
//!     println!("model: {}", config.ai.model);
//! }
//! ```

mod ai;
mod error;
mod general;

pub use ai::AiConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Unprefixed env var for the API key, as used by other Gemini tooling.
pub const LEGACY_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Prefix for all QueryGem environment overrides.
pub const ENV_PREFIX: &str = "QUERYGEM_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GemConfig {
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl GemConfig {
    /// Load configuration from TOML files and environment variables.
    ///
    /// Does NOT call `dotenvy`; use [`GemConfig::load_with_dotenv`] for that.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source fails to parse or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.ai.validate()?;
        Ok(config)
    }

    /// Load `.env` from the current directory, then [`GemConfig::load`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source fails to parse or a value is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can extract from it directly or stack providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".querygem/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment = figment.merge(
            Env::raw()
                .only(&[LEGACY_API_KEY_VAR])
                .map(|_| "ai.api_key".into()),
        );

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("querygem").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = GemConfig::default();
        assert!(!config.ai.is_configured());
        assert_eq!(config.general.display_limit, 200);
        assert!(config.general.confirm_disconnect);
    }

    #[test]
    fn defaults_survive_serialized_provider() {
        let config: GemConfig = Figment::from(Serialized::defaults(GemConfig::default()))
            .extract()
            .expect("should extract defaults");
        assert_eq!(config.ai.model, "gemini-2.5-flash");
        assert!(!config.ai.allow_writes);
    }
}
