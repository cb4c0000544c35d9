//! Local database configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database file path. Empty means `<project>/.kanri/kanri.db`;
    /// relative paths resolve against the project root.
    #[serde(default)]
    pub path: String,
}

impl DatabaseConfig {
    #[must_use]
    pub fn resolve(&self, project_root: &Path) -> PathBuf {
        if self.path.trim().is_empty() {
            return project_root.join(".kanri").join("kanri.db");
        }
        let path = PathBuf::from(&self.path);
        if path.is_absolute() {
            path
        } else {
            project_root.join(path)
        }
    }
}
