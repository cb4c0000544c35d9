//! Shared test utilities for kanri-db unit tests.

use chrono::NaiveDate;
use kanri_core::entities::{NewTask, Task};
use kanri_core::enums::TaskStatus;

use crate::KanriDb;
use crate::service::KanriService;

/// In-memory service acting as `tester`.
pub async fn test_service() -> KanriService {
    let db = KanriDb::open_local(":memory:").await.unwrap();
    KanriService::from_db(db, "tester")
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Create a task due on `due` in `status` (moved there after creation when needed).
pub async fn seed_task(svc: &KanriService, title: &str, due: &str, status: TaskStatus) -> Task {
    let created = svc
        .create_task(NewTask::new(title, "tester").due(date(due)))
        .await
        .unwrap();
    if status == TaskStatus::Pending {
        return created;
    }
    if status == TaskStatus::Overdue {
        svc.db()
            .conn()
            .execute(
                "UPDATE tasks SET status = 'overdue' WHERE id = ?1",
                [created.id.get()],
            )
            .await
            .unwrap();
        return svc.get_task(created.id).await.unwrap();
    }
    svc.update_task_status(created.id, status).await.unwrap()
}
