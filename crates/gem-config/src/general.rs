//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default cap on rows printed per result set.
const fn default_display_limit() -> u32 {
    200
}

const fn default_confirm_disconnect() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Maximum rows rendered per result set (`--limit` overrides).
    #[serde(default = "default_display_limit")]
    pub display_limit: u32,

    /// Ask before closing the active database.
    #[serde(default = "default_confirm_disconnect")]
    pub confirm_disconnect: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            display_limit: default_display_limit(),
            confirm_disconnect: default_confirm_disconnect(),
        }
    }
}
