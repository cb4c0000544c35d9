use std::path::Path;

use anyhow::Context;
use kanri_config::KanriConfig;

/// Load `<project>/.env` if present, then the layered config for the project.
pub fn load_config(project_root: &Path) -> anyhow::Result<KanriConfig> {
    let env_path = project_root.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }

    KanriConfig::load_for_project(project_root).map_err(anyhow::Error::from)
}
