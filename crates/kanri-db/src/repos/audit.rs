//! Audit trail repository.
//!
//! Append-only entries recording every task mutation, queried newest first.

use chrono::Utc;
use serde::Serialize;

use kanri_core::entities::AuditEntry;
use kanri_core::enums::AuditAction;
use kanri_core::ids::TaskId;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_json};
use crate::service::KanriService;

/// Filter criteria for audit queries.
#[derive(Debug, Default)]
pub struct AuditFilter {
    pub task_id: Option<TaskId>,
    pub action: Option<AuditAction>,
    pub actor: Option<String>,
    pub limit: Option<u32>,
}

impl KanriService {
    /// Append an audit entry for `task_id`, attributed to the acting user.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the detail cannot be serialized or the INSERT fails.
    pub async fn append_audit<D: Serialize + Sync>(
        &self,
        task_id: TaskId,
        action: AuditAction,
        detail: Option<&D>,
    ) -> Result<(), DatabaseError> {
        let detail = detail
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| DatabaseError::Other(e.into()))?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO audit_trail (task_id, action, actor, detail, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![
                    task_id.get(),
                    action.as_str(),
                    self.actor(),
                    detail.as_deref(),
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;
        Ok(())
    }

    /// Query audit entries with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn query_audit(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(task_id) = filter.task_id {
            params.push(libsql::Value::Integer(task_id.get()));
            conditions.push(format!("task_id = ?{}", params.len()));
        }
        if let Some(action) = filter.action {
            params.push(libsql::Value::Text(action.as_str().to_string()));
            conditions.push(format!("action = ?{}", params.len()));
        }
        if let Some(ref actor) = filter.actor {
            params.push(libsql::Value::Text(actor.clone()));
            conditions.push(format!("actor = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT id, task_id, action, actor, detail, created_at
             FROM audit_trail {where_clause}
             ORDER BY id DESC LIMIT {limit}"
        );

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(AuditEntry {
                id: row.get::<i64>(0)?,
                task_id: TaskId(row.get::<i64>(1)?),
                action: parse_enum(&row.get::<String>(2)?)?,
                actor: get_opt_string(&row, 3)?,
                detail: parse_optional_json(get_opt_string(&row, 4)?.as_deref())?,
                created_at: parse_datetime(&row.get::<String>(5)?)?,
            });
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_service;
    use kanri_core::audit_detail::StatusChangedDetail;
    use kanri_core::enums::TaskStatus;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn append_and_query_by_task() {
        let svc = test_service().await;
        let detail = StatusChangedDetail {
            from: TaskStatus::Pending,
            to: TaskStatus::Done,
            reason: None,
        };
        svc.append_audit(TaskId(5), AuditAction::StatusChanged, Some(&detail))
            .await
            .unwrap();
        svc.append_audit::<()>(TaskId(6), AuditAction::Deleted, None)
            .await
            .unwrap();

        let entries = svc
            .query_audit(&AuditFilter {
                task_id: Some(TaskId(5)),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, AuditAction::StatusChanged);
        assert_eq!(entries[0].actor.as_deref(), Some("tester"));
        let stored: StatusChangedDetail =
            serde_json::from_value(entries[0].detail.clone().unwrap()).unwrap();
        assert_eq!(stored, detail);
    }

    #[tokio::test]
    async fn newest_entry_comes_first() {
        let svc = test_service().await;
        svc.append_audit::<()>(TaskId(1), AuditAction::Created, None)
            .await
            .unwrap();
        svc.append_audit::<()>(TaskId(1), AuditAction::Updated, None)
            .await
            .unwrap();

        let entries = svc.query_audit(&AuditFilter::default()).await.unwrap();
        let actions: Vec<_> = entries.iter().map(|e| e.action).collect();
        assert_eq!(actions, vec![AuditAction::Updated, AuditAction::Created]);
    }

    #[tokio::test]
    async fn limit_caps_results() {
        let svc = test_service().await;
        for _ in 0..3 {
            svc.append_audit::<()>(TaskId(1), AuditAction::Updated, None)
                .await
                .unwrap();
        }
        let entries = svc
            .query_audit(&AuditFilter {
                limit: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
    }
}
