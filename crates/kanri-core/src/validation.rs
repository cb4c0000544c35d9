//! Input validation for task creation and updates.
//!
//! Validation failures name the offending field so the caller can show the
//! message next to it.

use chrono::NaiveDate;

use crate::entities::{NewTask, Task};
use crate::enums::{Priority, TaskStatus};
use crate::errors::CoreError;
use crate::guard::check_transition;
use crate::updates::TaskUpdate;

/// A `NewTask` that passed validation, with defaults resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub start_date: Option<NaiveDate>,
    pub due_date: NaiveDate,
    pub patient_id: Option<String>,
    pub owner_id: String,
}

/// Validate a creation request and resolve its defaults.
///
/// # Errors
///
/// Returns `CoreError::InvalidField` for a blank title or owner, a missing due
/// date with no start date to fall back on, a due date before the start date,
/// or a pre-selected `overdue` status.
pub fn validate_new_task(new: NewTask) -> Result<TaskDraft, CoreError> {
    let title = new.title.trim().to_string();
    if title.is_empty() {
        return Err(CoreError::invalid("title", "title is required"));
    }

    let owner_id = new.owner_id.trim().to_string();
    if owner_id.is_empty() {
        return Err(CoreError::invalid("owner_id", "owner is required"));
    }

    let due_date = new.due_date.or(new.start_date).ok_or_else(|| {
        CoreError::invalid("due_date", "due date is required when no start date is set")
    })?;
    check_dates(new.start_date, due_date)?;

    let status = new.status.unwrap_or(TaskStatus::Pending);
    if status.is_system_assigned() {
        return Err(CoreError::invalid(
            "status",
            format!("{status} is assigned by the system"),
        ));
    }

    Ok(TaskDraft {
        title,
        description: normalize_text(new.description),
        priority: new.priority,
        status,
        start_date: new.start_date,
        due_date,
        patient_id: normalize_text(new.patient_id),
        owner_id,
    })
}

/// Validate an update against the task it will be applied to.
///
/// # Errors
///
/// Returns `CoreError::InvalidField` for a blank title or an inverted date
/// range, and `CoreError::GuardedTransition` when the update changes the
/// status of, or into, a system-assigned status.
pub fn validate_update(current: &Task, update: &TaskUpdate) -> Result<(), CoreError> {
    if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(CoreError::invalid("title", "title is required"));
    }

    let start = update.start_date.unwrap_or(current.start_date);
    let due = update.due_date.unwrap_or(current.due_date);
    check_dates(start, due)?;

    if let Some(status) = update.status.filter(|s| *s != current.status) {
        check_transition(current.id, current.status, status)?;
    }
    Ok(())
}

fn check_dates(start: Option<NaiveDate>, due: NaiveDate) -> Result<(), CoreError> {
    match start {
        Some(start) if due < start => Err(CoreError::invalid(
            "due_date",
            format!("due date {due} is before start date {start}"),
        )),
        _ => Ok(()),
    }
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::TaskId;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn stored(status: TaskStatus) -> Task {
        Task {
            id: TaskId(1),
            title: "Call patient".into(),
            description: None,
            priority: Priority::Medium,
            status,
            start_date: Some(date("2026-03-01")),
            due_date: date("2026-03-05"),
            patient_id: None,
            owner_id: "dr-lee".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn due_date_defaults_to_start_date() {
        let draft =
            validate_new_task(NewTask::new("Follow up", "dr-lee").starting(date("2026-03-01")))
                .unwrap();
        assert_eq!(draft.due_date, date("2026-03-01"));
        assert_eq!(draft.status, TaskStatus::Pending);
    }

    #[test]
    fn missing_both_dates_is_rejected_on_due_date() {
        let err = validate_new_task(NewTask::new("Follow up", "dr-lee")).unwrap_err();
        assert_eq!(err.field(), Some("due_date"));
    }

    #[test]
    fn blank_title_is_rejected() {
        let err =
            validate_new_task(NewTask::new("   ", "dr-lee").due(date("2026-03-01"))).unwrap_err();
        assert_eq!(err.field(), Some("title"));
    }

    #[test]
    fn due_before_start_is_rejected() {
        let new = NewTask::new("Follow up", "dr-lee")
            .starting(date("2026-03-10"))
            .due(date("2026-03-01"));
        assert_eq!(validate_new_task(new).unwrap_err().field(), Some("due_date"));
    }

    #[test]
    fn cannot_create_directly_into_overdue() {
        let new = NewTask::new("Follow up", "dr-lee")
            .due(date("2026-03-01"))
            .with_status(TaskStatus::Overdue);
        assert_eq!(validate_new_task(new).unwrap_err().field(), Some("status"));
    }

    #[test]
    fn text_fields_are_trimmed_and_blank_cleared() {
        let mut new = NewTask::new("  Review labs ", "dr-lee").due(date("2026-03-01"));
        new.description = Some("   ".into());
        new.patient_id = Some(" pat-9 ".into());
        let draft = validate_new_task(new).unwrap();
        assert_eq!(draft.title, "Review labs");
        assert_eq!(draft.description, None);
        assert_eq!(draft.patient_id.as_deref(), Some("pat-9"));
    }

    #[test]
    fn update_keeps_date_order() {
        let update = TaskUpdate {
            due_date: Some(date("2026-02-01")),
            ..TaskUpdate::default()
        };
        let err = validate_update(&stored(TaskStatus::Pending), &update).unwrap_err();
        assert_eq!(err.field(), Some("due_date"));
    }

    #[test]
    fn clearing_start_date_lifts_the_bound() {
        let update = TaskUpdate {
            start_date: Some(None),
            due_date: Some(date("2026-02-01")),
            ..TaskUpdate::default()
        };
        assert!(validate_update(&stored(TaskStatus::Pending), &update).is_ok());
    }

    #[test]
    fn update_status_is_guarded() {
        let update = TaskUpdate {
            status: Some(TaskStatus::Done),
            ..TaskUpdate::default()
        };
        let err = validate_update(&stored(TaskStatus::Overdue), &update).unwrap_err();
        assert!(matches!(err, CoreError::GuardedTransition { .. }));
    }

    #[test]
    fn editing_fields_of_overdue_task_is_allowed() {
        let update = TaskUpdate {
            title: Some("Call patient again".into()),
            status: Some(TaskStatus::Overdue),
            ..TaskUpdate::default()
        };
        assert!(validate_update(&stored(TaskStatus::Overdue), &update).is_ok());
    }
}
