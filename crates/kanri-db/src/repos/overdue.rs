//! Overdue sweep: the only writer of `TaskStatus::Overdue`.

use chrono::{NaiveDate, Utc};

use kanri_core::audit_detail::StatusChangedDetail;
use kanri_core::enums::{AuditAction, TaskStatus};
use kanri_core::ids::TaskId;

use crate::error::DatabaseError;
use crate::helpers::{parse_enum, placeholders};
use crate::service::KanriService;

const SWEEP_REASON: &str = "due date passed";

impl KanriService {
    /// Mark every open task due before `today` as overdue.
    ///
    /// Only statuses in [`TaskStatus::sweepable`] are touched. Returns the
    /// number of tasks marked.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails.
    pub async fn mark_overdue(&self, today: NaiveDate) -> Result<u64, DatabaseError> {
        let sources = TaskStatus::sweepable();
        let source_values: Vec<libsql::Value> =
            sources.iter().map(|s| libsql::Value::from(s.as_str())).collect();

        let mut params: Vec<libsql::Value> = vec![today.to_string().into()];
        params.extend(source_values.iter().cloned());
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT id, status FROM tasks WHERE due_date < ?1 AND status IN ({})",
                    placeholders(2, sources.len())
                ),
                libsql::params_from_iter(params),
            )
            .await?;
        let mut due: Vec<(TaskId, TaskStatus)> = Vec::new();
        while let Some(row) = rows.next().await? {
            due.push((
                TaskId(row.get::<i64>(0)?),
                parse_enum(&row.get::<String>(1)?)?,
            ));
        }
        drop(rows);
        if due.is_empty() {
            return Ok(0);
        }

        let mut params: Vec<libsql::Value> = vec![
            TaskStatus::Overdue.as_str().into(),
            Utc::now().to_rfc3339().into(),
            today.to_string().into(),
        ];
        params.extend(source_values);
        let marked = self
            .db()
            .conn()
            .execute(
                &format!(
                    "UPDATE tasks SET status = ?1, updated_at = ?2
                     WHERE due_date < ?3 AND status IN ({})",
                    placeholders(4, sources.len())
                ),
                libsql::params_from_iter(params),
            )
            .await?;

        for (id, from) in due {
            let detail = StatusChangedDetail {
                from,
                to: TaskStatus::Overdue,
                reason: Some(SWEEP_REASON.to_string()),
            };
            self.append_audit(id, AuditAction::StatusChanged, Some(&detail))
                .await?;
        }

        tracing::info!(marked, %today, "overdue sweep");
        Ok(marked)
    }
}
