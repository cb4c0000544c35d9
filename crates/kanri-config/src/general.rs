//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default result limit.
const fn default_limit() -> u32 {
    20
}

fn default_user() -> String {
    "local".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Acting user. Recorded in the audit trail and used as the default task owner.
    #[serde(default = "default_user")]
    pub user: String,

    /// Default result limit for list commands.
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            user: default_user(),
            default_limit: default_limit(),
        }
    }
}
