//! Task repository: CRUD, guarded status changes, bulk actions, and paged listings.

use chrono::Utc;

use kanri_core::audit_detail::{StatusChangedDetail, UpdatedDetail};
use kanri_core::entities::{NewTask, Task};
use kanri_core::enums::{AuditAction, TaskStatus};
use kanri_core::errors::CoreError;
use kanri_core::guard::check_transition;
use kanri_core::ids::TaskId;
use kanri_core::query::{Page, PageRequest, SortDirection, SortField, TaskFilter, TaskSort};
use kanri_core::store::dedup_ids;
use kanri_core::updates::TaskUpdate;
use kanri_core::validation::{validate_new_task, validate_update};

use crate::error::DatabaseError;
use crate::helpers::{
    get_opt_string, like_pattern, opt_text, parse_date, parse_datetime, parse_enum,
    parse_optional_date, placeholders,
};
use crate::service::KanriService;

const SELECT_COLS: &str = "id, title, description, priority, status, start_date, due_date, \
                           patient_id, owner_id, created_at, updated_at";

const BULK_REASON: &str = "bulk update";

fn row_to_task(row: &libsql::Row) -> Result<Task, DatabaseError> {
    Ok(Task {
        id: TaskId(row.get::<i64>(0)?),
        title: row.get(1)?,
        description: get_opt_string(row, 2)?,
        priority: parse_enum(&row.get::<String>(3)?)?,
        status: parse_enum(&row.get::<String>(4)?)?,
        start_date: parse_optional_date(get_opt_string(row, 5)?.as_deref())?,
        due_date: parse_date(&row.get::<String>(6)?)?,
        patient_id: get_opt_string(row, 7)?,
        owner_id: row.get(8)?,
        created_at: parse_datetime(&row.get::<String>(9)?)?,
        updated_at: parse_datetime(&row.get::<String>(10)?)?,
    })
}

fn order_clause(sort: TaskSort) -> String {
    let expr = match sort.field {
        SortField::DueDate => "due_date",
        SortField::Priority => "CASE priority WHEN 'low' THEN 1 WHEN 'medium' THEN 2 ELSE 3 END",
        SortField::CreatedAt => "created_at",
        SortField::Title => "title COLLATE NOCASE",
        SortField::Status => {
            "CASE status WHEN 'pending' THEN 1 WHEN 'in_progress' THEN 2 \
             WHEN 'done' THEN 3 WHEN 'overdue' THEN 4 ELSE 5 END"
        }
    };
    let direction = match sort.direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    };
    format!("ORDER BY {expr} {direction}, id ASC")
}

/// WHERE clause and its bound values for a task filter.
fn filter_clause(filter: &TaskFilter) -> (String, Vec<libsql::Value>) {
    let mut conditions = Vec::new();
    let mut params: Vec<libsql::Value> = Vec::new();

    if let Some(status) = filter.status {
        params.push(status.as_str().into());
        conditions.push(format!("status = ?{}", params.len()));
    }
    if let Some(priority) = filter.priority {
        params.push(priority.as_str().into());
        conditions.push(format!("priority = ?{}", params.len()));
    }
    if let Some(ref patient_id) = filter.patient_id {
        params.push(patient_id.clone().into());
        conditions.push(format!("patient_id = ?{}", params.len()));
    }
    if let Some(ref owner_id) = filter.owner_id {
        params.push(owner_id.clone().into());
        conditions.push(format!("owner_id = ?{}", params.len()));
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        params.push(like_pattern(search).into());
        let idx = params.len();
        conditions.push(format!(
            "(title LIKE ?{idx} ESCAPE '\\' OR description LIKE ?{idx} ESCAPE '\\')"
        ));
    }
    if let Some(from) = filter.due_from {
        params.push(from.to_string().into());
        conditions.push(format!("due_date >= ?{}", params.len()));
    }
    if let Some(to) = filter.due_to {
        params.push(to.to_string().into());
        conditions.push(format!("due_date <= ?{}", params.len()));
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (clause, params)
}

fn changed_fields(update: &TaskUpdate) -> Vec<String> {
    [
        ("title", update.title.is_some()),
        ("description", update.description.is_some()),
        ("priority", update.priority.is_some()),
        ("status", update.status.is_some()),
        ("start_date", update.start_date.is_some()),
        ("due_date", update.due_date.is_some()),
        ("patient_id", update.patient_id.is_some()),
    ]
    .into_iter()
    .filter_map(|(name, set)| set.then(|| name.to_string()))
    .collect()
}

impl KanriService {
    /// Validate and insert a new task.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Core` with `CoreError::InvalidField` when the
    /// input is invalid, or a storage error if the INSERT fails.
    pub async fn create_task(&self, new: NewTask) -> Result<Task, DatabaseError> {
        let draft = validate_new_task(new)?;
        let now = Utc::now().to_rfc3339();

        self.db()
            .conn()
            .execute(
                "INSERT INTO tasks (title, description, priority, status, start_date, due_date,
                                    patient_id, owner_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                libsql::params_from_iter(vec![
                    libsql::Value::Text(draft.title),
                    opt_text(draft.description.as_deref()),
                    draft.priority.as_str().into(),
                    draft.status.as_str().into(),
                    opt_text(draft.start_date.map(|d| d.to_string()).as_deref()),
                    draft.due_date.to_string().into(),
                    opt_text(draft.patient_id.as_deref()),
                    libsql::Value::Text(draft.owner_id),
                    now.clone().into(),
                    now.into(),
                ]),
            )
            .await?;
        let id = TaskId(self.db().conn().last_insert_rowid());

        self.append_audit::<()>(id, AuditAction::Created, None).await?;
        tracing::debug!(task_id = %id, "created task");
        self.get_task(id).await
    }

    /// # Errors
    ///
    /// Returns `CoreError::NotFound` (wrapped) if no task has this id.
    pub async fn get_task(&self, id: TaskId) -> Result<Task, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM tasks WHERE id = ?1"),
                [id.get()],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| CoreError::task_not_found(id))?;
        row_to_task(&row)
    }

    /// Apply a partial update. A status change is guarded and audited as
    /// `StatusChanged` in addition to the `Updated` entry.
    ///
    /// # Errors
    ///
    /// Returns a wrapped `CoreError` for a missing task, invalid fields, or a
    /// guarded status change.
    pub async fn update_task(&self, id: TaskId, update: TaskUpdate) -> Result<Task, DatabaseError> {
        let current = self.get_task(id).await?;
        validate_update(&current, &update)?;
        if update.is_empty() {
            return Ok(current);
        }
        self.write_update(&current, &update).await
    }

    /// Write a validated update. A status change only lands while the row
    /// still holds `current.status`.
    async fn write_update(&self, current: &Task, update: &TaskUpdate) -> Result<Task, DatabaseError> {
        let id = current.id;
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref title) = update.title {
            params.push(title.trim().to_string().into());
            sets.push(format!("title = ?{}", params.len()));
        }
        if let Some(ref description) = update.description {
            params.push(opt_text(description.as_deref()));
            sets.push(format!("description = ?{}", params.len()));
        }
        if let Some(priority) = update.priority {
            params.push(priority.as_str().into());
            sets.push(format!("priority = ?{}", params.len()));
        }
        if let Some(status) = update.status {
            params.push(status.as_str().into());
            sets.push(format!("status = ?{}", params.len()));
        }
        if let Some(start_date) = update.start_date {
            params.push(opt_text(start_date.map(|d| d.to_string()).as_deref()));
            sets.push(format!("start_date = ?{}", params.len()));
        }
        if let Some(due_date) = update.due_date {
            params.push(due_date.to_string().into());
            sets.push(format!("due_date = ?{}", params.len()));
        }
        if let Some(ref patient_id) = update.patient_id {
            params.push(opt_text(patient_id.as_deref()));
            sets.push(format!("patient_id = ?{}", params.len()));
        }

        params.push(Utc::now().to_rfc3339().into());
        sets.push(format!("updated_at = ?{}", params.len()));

        params.push(id.get().into());
        let mut sql = format!(
            "UPDATE tasks SET {} WHERE id = ?{}",
            sets.join(", "),
            params.len()
        );
        if update.status.is_some() {
            params.push(current.status.as_str().into());
            sql.push_str(&format!(" AND status = ?{}", params.len()));
        }
        let changed = self
            .db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        if changed == 0 {
            return Err(self
                .status_write_missed(id, update.status.unwrap_or(current.status))
                .await);
        }

        let detail = UpdatedDetail {
            fields: changed_fields(update),
        };
        self.append_audit(id, AuditAction::Updated, Some(&detail))
            .await?;
        if let Some(status) = update.status.filter(|s| *s != current.status) {
            let detail = StatusChangedDetail {
                from: current.status,
                to: status,
                reason: None,
            };
            self.append_audit(id, AuditAction::StatusChanged, Some(&detail))
                .await?;
        }

        tracing::debug!(task_id = %id, fields = ?detail.fields, "updated task");
        self.get_task(id).await
    }

    /// Persist a user-initiated status change.
    ///
    /// Moving to the current status is accepted and leaves the row untouched.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::GuardedTransition` (wrapped) when the task is
    /// overdue or `status` is `overdue`, and `CoreError::NotFound` when the
    /// task does not exist.
    pub async fn update_task_status(
        &self,
        id: TaskId,
        status: TaskStatus,
    ) -> Result<Task, DatabaseError> {
        let current = self.get_task(id).await?;
        self.write_status(current, status).await
    }

    /// Guard and write a status change against the row as it was read.
    ///
    /// The UPDATE is conditional on the row still holding `current.status`,
    /// so a sweep that marks the task overdue after the read wins.
    async fn write_status(&self, current: Task, status: TaskStatus) -> Result<Task, DatabaseError> {
        let id = current.id;
        check_transition(id, current.status, status)?;
        if current.status == status {
            return Ok(current);
        }

        let now = Utc::now();
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE tasks SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4",
                libsql::params![
                    status.as_str(),
                    now.to_rfc3339(),
                    id.get(),
                    current.status.as_str()
                ],
            )
            .await?;
        if changed == 0 {
            return Err(self.status_write_missed(id, status).await);
        }

        let detail = StatusChangedDetail {
            from: current.status,
            to: status,
            reason: None,
        };
        self.append_audit(id, AuditAction::StatusChanged, Some(&detail))
            .await?;
        tracing::debug!(task_id = %id, from = %current.status, to = %status, "changed task status");

        Ok(Task {
            status,
            updated_at: now,
            ..current
        })
    }

    /// Explain a conditional status write that matched no row: the task is
    /// gone, it became guarded, or another writer changed it first.
    async fn status_write_missed(&self, id: TaskId, requested: TaskStatus) -> DatabaseError {
        match self.get_task(id).await {
            Err(err) => err,
            Ok(fresh) => match check_transition(id, fresh.status, requested) {
                Err(guarded) => guarded.into(),
                Ok(()) => DatabaseError::Other(anyhow::anyhow!(
                    "task {id} changed status to {} concurrently",
                    fresh.status
                )),
            },
        }
    }

    /// Move every eligible task in `ids` to `status`.
    ///
    /// Eligibility is [`TaskStatus::bulk_sources`]; ineligible and unknown ids
    /// are skipped. Returns the number of rows changed.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidField` (wrapped) when `status` is
    /// system-assigned, or a storage error.
    pub async fn bulk_update_status(
        &self,
        ids: &[TaskId],
        status: TaskStatus,
    ) -> Result<u64, DatabaseError> {
        if status.is_system_assigned() {
            return Err(CoreError::InvalidField {
                field: "status",
                message: format!("{status} is assigned by the system"),
            }
            .into());
        }

        let ids = dedup_ids(ids);
        let sources = TaskStatus::bulk_sources(status);
        if ids.is_empty() || sources.is_empty() {
            return Ok(0);
        }

        let id_values: Vec<libsql::Value> =
            ids.iter().map(|id| libsql::Value::Integer(id.get())).collect();
        let source_values: Vec<libsql::Value> = sources
            .iter()
            .map(|s| libsql::Value::from(s.as_str()))
            .collect();

        // Capture each row's prior status for its audit entry.
        let select_sql = format!(
            "SELECT id, status FROM tasks WHERE id IN ({}) AND status IN ({})",
            placeholders(1, ids.len()),
            placeholders(1 + ids.len(), sources.len())
        );
        let select_params: Vec<libsql::Value> = id_values
            .iter()
            .chain(&source_values)
            .cloned()
            .collect();
        let mut rows = self
            .db()
            .conn()
            .query(&select_sql, libsql::params_from_iter(select_params))
            .await?;
        let mut eligible: Vec<(TaskId, TaskStatus)> = Vec::new();
        while let Some(row) = rows.next().await? {
            eligible.push((
                TaskId(row.get::<i64>(0)?),
                parse_enum(&row.get::<String>(1)?)?,
            ));
        }
        drop(rows);
        if eligible.is_empty() {
            return Ok(0);
        }

        // ?1 = target status, ?2 = updated_at, then the ids, then the sources.
        let update_sql = format!(
            "UPDATE tasks SET status = ?1, updated_at = ?2 WHERE id IN ({}) AND status IN ({})",
            placeholders(3, ids.len()),
            placeholders(3 + ids.len(), sources.len())
        );
        let mut params: Vec<libsql::Value> =
            vec![status.as_str().into(), Utc::now().to_rfc3339().into()];
        params.extend(id_values);
        params.extend(source_values);
        let updated = self
            .db()
            .conn()
            .execute(&update_sql, libsql::params_from_iter(params))
            .await?;

        for (id, from) in eligible {
            let detail = StatusChangedDetail {
                from,
                to: status,
                reason: Some(BULK_REASON.to_string()),
            };
            self.append_audit(id, AuditAction::StatusChanged, Some(&detail))
                .await?;
        }

        tracing::debug!(requested = ids.len(), updated, to = %status, "bulk status update");
        Ok(updated)
    }

    /// Delete a task. The audit trail keeps its history.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` (wrapped) if no task has this id.
    pub async fn delete_task(&self, id: TaskId) -> Result<(), DatabaseError> {
        let task = self.get_task(id).await?;

        self.db()
            .conn()
            .execute("DELETE FROM tasks WHERE id = ?1", [id.get()])
            .await?;

        self.append_audit(id, AuditAction::Deleted, Some(&task))
            .await?;
        tracing::debug!(task_id = %id, "deleted task");
        Ok(())
    }

    /// Filtered, sorted, paged task listing.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails or a row cannot be parsed.
    pub async fn list_tasks(
        &self,
        filter: &TaskFilter,
        sort: TaskSort,
        page: PageRequest,
    ) -> Result<Page<Task>, DatabaseError> {
        let (where_clause, params) = filter_clause(filter);

        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT COUNT(*) FROM tasks {where_clause}"),
                libsql::params_from_iter(params.clone()),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let total = u64::try_from(row.get::<i64>(0)?).unwrap_or(0);
        drop(rows);

        let sql = format!(
            "SELECT {SELECT_COLS} FROM tasks {where_clause} {} LIMIT {} OFFSET {}",
            order_clause(sort),
            page.per_page,
            page.offset()
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;

        let mut tasks = Vec::new();
        while let Some(row) = rows.next().await? {
            tasks.push(row_to_task(&row)?);
        }
        Ok(Page::new(tasks, page, total))
    }

    /// One page of a board column, ordered by due date then id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails or a row cannot be parsed.
    pub async fn list_tasks_by_status(
        &self,
        status: TaskStatus,
        page: PageRequest,
    ) -> Result<Page<Task>, DatabaseError> {
        self.list_tasks(&TaskFilter::by_status(status), TaskSort::default(), page)
            .await
    }
}
