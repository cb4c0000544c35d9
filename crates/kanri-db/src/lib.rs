//! # kanri-db
//!
//! libSQL storage for Kanri tasks.
//!
//! Holds the task table and its audit trail, runs the embedded migrations on
//! open, and implements the `TaskStore` port on [`service::KanriService`].
//!
//! Uses the `libsql` crate (C `SQLite` fork) in local mode.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
mod store;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Database handle: a libSQL database and its single connection.
pub struct KanriDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl KanriDb {
    /// Open a local database at `path`, or `":memory:"` for tests.
    ///
    /// Runs migrations automatically on every open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        let kanri_db = Self { db, conn };
        kanri_db.run_migrations().await?;
        tracing::debug!(path, "opened task database");
        Ok(kanri_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> KanriDb {
        KanriDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        for table in ["tasks", "audit_trail"] {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn schema_rejects_inverted_dates() {
        let db = test_db().await;
        let result = db
            .conn()
            .execute(
                "INSERT INTO tasks (title, status, start_date, due_date, owner_id, created_at, updated_at)
                 VALUES ('x', 'pending', '2026-03-10', '2026-03-01', 'o', 'now', 'now')",
                (),
            )
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn file_database_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kanri.db");
        let path = path.to_str().unwrap();

        {
            let db = KanriDb::open_local(path).await.unwrap();
            db.conn()
                .execute(
                    "INSERT INTO tasks (title, due_date, owner_id, created_at, updated_at)
                     VALUES ('kept', '2026-03-01', 'o', 'now', 'now')",
                    (),
                )
                .await
                .unwrap();
        }

        let db = KanriDb::open_local(path).await.unwrap();
        let mut rows = db
            .conn()
            .query("SELECT COUNT(*) FROM tasks", ())
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 1);
    }
}
