use std::path::{Path, PathBuf};

use anyhow::Context;
use kanri_config::PROJECT_DIR;
use serde::Serialize;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::InitArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct InitResponse {
    project_root: PathBuf,
    database: PathBuf,
    /// `false` when the project directory already existed.
    created: bool,
}

/// Handle `kanri init`.
pub async fn handle(args: &InitArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = init_project(Path::new(&args.path)).await?;
    output(&response, flags.format)
}

async fn init_project(path: &Path) -> anyhow::Result<InitResponse> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let project_root = path
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", path.display()))?;

    let kanri_dir = project_root.join(PROJECT_DIR);
    let created = !kanri_dir.exists();
    std::fs::create_dir_all(&kanri_dir)
        .with_context(|| format!("failed to create {}", kanri_dir.display()))?;

    let config = bootstrap::load_config(&project_root)?;
    let database = config.database.resolve(&project_root);
    // Opening the database applies the schema.
    AppContext::init(project_root.clone(), config).await?;
    tracing::info!(root = %project_root.display(), created, "project initialized");

    Ok(InitResponse {
        project_root,
        database,
        created,
    })
}
