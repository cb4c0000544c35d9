//! The libSQL service exercised through the `TaskStore` port.

use std::sync::Arc;

use chrono::NaiveDate;
use kanri_core::entities::NewTask;
use kanri_core::enums::TaskStatus;
use kanri_core::errors::CoreError;
use kanri_core::ids::TaskId;
use kanri_core::query::PageRequest;
use kanri_core::store::TaskStore;
use kanri_db::service::KanriService;
use pretty_assertions::assert_eq;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

async fn store() -> Arc<dyn TaskStore> {
    Arc::new(KanriService::new_local(":memory:", "front-desk").await.unwrap())
}

async fn column_ids(store: &dyn TaskStore, status: TaskStatus) -> Vec<TaskId> {
    store
        .list_tasks_by_status(status, PageRequest::new(1, 50))
        .await
        .unwrap()
        .items
        .into_iter()
        .map(|t| t.id)
        .collect()
}

#[tokio::test]
async fn moved_task_appears_only_in_new_column() {
    let store = store().await;
    let task = store
        .create_task(NewTask::new("Confirm appointment", "front-desk").due(date("2026-03-02")))
        .await
        .unwrap();

    store
        .update_task_status(task.id, TaskStatus::Done)
        .await
        .unwrap();

    assert_eq!(column_ids(store.as_ref(), TaskStatus::Done).await, vec![task.id]);
    for status in [TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Overdue] {
        assert!(column_ids(store.as_ref(), status).await.is_empty());
    }
}

#[tokio::test]
async fn bulk_reports_only_eligible_rows() {
    let store = store().await;
    let mut ids = Vec::new();
    for title in ["1", "2", "3", "4", "5"] {
        let task = store
            .create_task(NewTask::new(title, "front-desk").due(date("2026-03-02")))
            .await
            .unwrap();
        ids.push(task.id);
    }
    // Two of five are already done, so they are ineligible for "mark done".
    store.update_task_status(ids[1], TaskStatus::Done).await.unwrap();
    store.update_task_status(ids[3], TaskStatus::Done).await.unwrap();

    let response = store
        .bulk_update_status(&ids, TaskStatus::Done)
        .await
        .unwrap();
    assert_eq!(response.updated_count, 3);
    assert_eq!(column_ids(store.as_ref(), TaskStatus::Done).await.len(), 5);
}

#[tokio::test]
async fn overdue_guard_holds_at_the_port() {
    let service = KanriService::new_local(":memory:", "front-desk").await.unwrap();
    let task = service
        .create_task(NewTask::new("Send reminder", "front-desk").due(date("2026-03-01")))
        .await
        .unwrap();
    service.mark_overdue(date("2026-03-02")).await.unwrap();

    let store: &dyn TaskStore = &service;
    let err = store
        .update_task_status(task.id, TaskStatus::InProgress)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::GuardedTransition {
            from: TaskStatus::Overdue,
            to: TaskStatus::InProgress,
            ..
        }
    ));
}

#[tokio::test]
async fn missing_task_is_not_found() {
    let store = store().await;
    let err = store.delete_task(TaskId(404)).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}
