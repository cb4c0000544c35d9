//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A layer failed to parse or a field has the wrong type.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A field parsed but holds a value Kanri cannot run with.
    #[error("Invalid value for '{field}': {reason} (set it in config.toml or {})", env_var(field))]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}

impl ConfigError {
    pub(crate) const fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::InvalidValue { field, reason }
    }
}

/// Environment variable that overrides a dotted config field,
/// e.g. `board.page_size` is `KANRI_BOARD__PAGE_SIZE`.
#[must_use]
fn env_var(field: &str) -> String {
    format!("KANRI_{}", field.replace('.', "__").to_ascii_uppercase())
}
