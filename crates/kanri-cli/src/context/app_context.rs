use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use kanri_board::session::{BoardSession, SessionOptions};
use kanri_config::KanriConfig;
use kanri_core::store::TaskStore;
use kanri_db::service::KanriService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: Arc<KanriService>,
    pub config: KanriConfig,
    pub project_root: PathBuf,
}

impl AppContext {
    /// Open the project database as the configured user.
    pub async fn init(project_root: PathBuf, config: KanriConfig) -> anyhow::Result<Self> {
        let db_path = config.database.resolve(&project_root);
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let service = KanriService::new_local(&db_path.to_string_lossy(), &config.general.user)
            .await
            .with_context(|| format!("failed to open database at {}", db_path.display()))?;
        tracing::debug!(path = %db_path.display(), user = %config.general.user, "database opened");

        Ok(Self {
            service: Arc::new(service),
            config,
            project_root,
        })
    }

    /// A board session over the project store, using the board config.
    pub fn board_session(&self) -> BoardSession {
        let store: Arc<dyn TaskStore> = self.service.clone();
        BoardSession::new(
            store,
            SessionOptions {
                per_page: self.config.board.page_size,
                rollback_on_failure: self.config.board.rollback_on_failure,
            },
        )
    }
}
