//! Kanban board configuration.

use serde::{Deserialize, Serialize};

/// Cards fetched per column page.
const fn default_page_size() -> u32 {
    10
}

const fn default_rollback_on_failure() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BoardConfig {
    /// Cards fetched per column on load and on each "load more".
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Move a card back to its original column when the store rejects the move.
    #[serde(default = "default_rollback_on_failure")]
    pub rollback_on_failure: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            rollback_on_failure: default_rollback_on_failure(),
        }
    }
}
