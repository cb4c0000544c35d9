//! # kanri-config
//!
//! Layered configuration loading for Kanri using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`KANRI_*` prefix, `__` as separator)
//! 2. Project-level `.kanri/config.toml`
//! 3. User-level `~/.config/kanri/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `KANRI_BOARD__PAGE_SIZE` -> `board.page_size`,
//! `KANRI_GENERAL__USER` -> `general.user`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use kanri_config::KanriConfig;
//!
//! let config = KanriConfig::load_with_dotenv().expect("config");
//! println!("cards per column: {}", config.board.page_size);
//! ```

mod board;
mod database;
mod error;
mod general;

pub use board::BoardConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the per-project directory holding config and the database.
pub const PROJECT_DIR: &str = ".kanri";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct KanriConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl KanriConfig {
    /// Load configuration from all sources, reading the project config from
    /// `.kanri/config.toml` relative to the current directory.
    ///
    /// Does NOT call `dotenvy`. Use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::extract(Self::figment(None))
    }

    /// Like [`Self::load`], with the project config read from `project_root`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load_for_project(project_root: &Path) -> Result<Self, ConfigError> {
        Self::extract(Self::figment(Some(project_root)))
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment(project_root: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = project_root.map_or_else(
            || PathBuf::from(PROJECT_DIR).join("config.toml"),
            |root| root.join(PROJECT_DIR).join("config.toml"),
        );
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("KANRI_").split("__"))
    }

    /// Reject values that deserialize fine but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board.page_size == 0 {
            return Err(ConfigError::invalid("board.page_size", "must be at least 1"));
        }
        if self.general.default_limit == 0 {
            return Err(ConfigError::invalid("general.default_limit", "must be at least 1"));
        }
        if self.general.user.trim().is_empty() {
            return Err(ConfigError::invalid("general.user", "must not be empty"));
        }
        Ok(())
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("kanri").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available), then falls back to
    /// the current directory. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
