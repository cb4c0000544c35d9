//! Service layer orchestrating task mutations with their audit entries.
//!
//! `KanriService` wraps `KanriDb` and the acting user. All repo methods are
//! implemented as `impl KanriService` blocks in `repos/`.

use crate::KanriDb;
use crate::error::DatabaseError;

/// Task storage with an audit trail.
///
/// Every mutation method follows this protocol:
/// 1. Load the current row when the change depends on it
/// 2. Validate and check the status guard
/// 3. Execute SQL
/// 4. Append one audit entry per changed task
pub struct KanriService {
    db: KanriDb,
    actor: String,
}

impl KanriService {
    /// Open a local database and act as `actor`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str, actor: impl Into<String>) -> Result<Self, DatabaseError> {
        let db = KanriDb::open_local(db_path).await?;
        Ok(Self::from_db(db, actor))
    }

    /// Create from an existing `KanriDb`.
    #[must_use]
    pub fn from_db(db: KanriDb, actor: impl Into<String>) -> Self {
        Self {
            db,
            actor: actor.into(),
        }
    }

    #[must_use]
    pub const fn db(&self) -> &KanriDb {
        &self.db
    }

    /// User recorded on audit entries and used as the default task owner.
    #[must_use]
    pub fn actor(&self) -> &str {
        &self.actor
    }
}
