//! Schema migrations.
//!
//! Migrations are embedded at compile time and applied in order on every
//! open. Each applied name is recorded in `schema_migrations`, so a file is
//! executed at most once per database even if it is not idempotent.

use crate::KanriDb;
use crate::error::DatabaseError;

/// Ordered `(name, sql)` pairs. Append only; never rename an entry.
const MIGRATIONS: &[(&str, &str)] = &[(
    "001_initial",
    include_str!("../migrations/001_initial.sql"),
)];

const LEDGER: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    name        TEXT PRIMARY KEY,
    applied_at  TEXT NOT NULL
)";

impl KanriDb {
    /// Apply every embedded migration not yet recorded as applied.
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute(LEDGER, ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("schema_migrations: {e}")))?;

        for (name, sql) in MIGRATIONS {
            if self.migration_applied(name).await? {
                continue;
            }
            self.conn
                .execute_batch(sql)
                .await
                .map_err(|e| DatabaseError::Migration(format!("{name}: {e}")))?;
            self.conn
                .execute(
                    "INSERT INTO schema_migrations (name, applied_at) VALUES (?1, ?2)",
                    libsql::params![*name, chrono::Utc::now().to_rfc3339()],
                )
                .await
                .map_err(|e| DatabaseError::Migration(format!("{name}: {e}")))?;
            tracing::debug!(migration = name, "applied migration");
        }
        Ok(())
    }

    async fn migration_applied(&self, name: &str) -> Result<bool, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                "SELECT 1 FROM schema_migrations WHERE name = ?1",
                libsql::params![name],
            )
            .await?;
        Ok(rows.next().await?.is_some())
    }
}
