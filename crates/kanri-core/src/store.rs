//! The task store port.
//!
//! Board and list surfaces talk to storage only through [`TaskStore`]. The
//! libSQL service in `kanri-db` is the durable implementation; `kanri-board`
//! ships an in-memory one for tests and offline use.
//!
//! Every implementation must re-check the status guard in
//! `update_task_status`, `update_task`, and `bulk_update_status`, so a client
//! that skips its own check still cannot move a task into or out of `overdue`.

use async_trait::async_trait;

use crate::entities::{NewTask, Task};
use crate::enums::TaskStatus;
use crate::errors::CoreError;
use crate::ids::TaskId;
use crate::query::{Page, PageRequest, TaskFilter, TaskSort};
use crate::responses::BulkUpdateResponse;
use crate::updates::TaskUpdate;

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Validate and persist a new task. The store assigns the id.
    async fn create_task(&self, new: NewTask) -> Result<Task, CoreError>;

    async fn get_task(&self, id: TaskId) -> Result<Task, CoreError>;

    /// Apply a partial update. A status change through this path is guarded
    /// like [`update_task_status`](Self::update_task_status).
    async fn update_task(&self, id: TaskId, update: TaskUpdate) -> Result<Task, CoreError>;

    /// Persist a status change, rejecting moves into or out of `overdue`.
    async fn update_task_status(&self, id: TaskId, status: TaskStatus)
    -> Result<Task, CoreError>;

    /// Move every eligible task in `ids` to `status`. Ineligible and unknown
    /// ids are skipped; the response counts only rows that changed.
    async fn bulk_update_status(
        &self,
        ids: &[TaskId],
        status: TaskStatus,
    ) -> Result<BulkUpdateResponse, CoreError>;

    /// One page of a single status column, ordered by due date then id.
    async fn list_tasks_by_status(
        &self,
        status: TaskStatus,
        page: PageRequest,
    ) -> Result<Page<Task>, CoreError>;

    async fn list_tasks(
        &self,
        filter: TaskFilter,
        sort: TaskSort,
        page: PageRequest,
    ) -> Result<Page<Task>, CoreError>;

    async fn delete_task(&self, id: TaskId) -> Result<(), CoreError>;
}

/// Deduplicate ids while keeping first-seen order.
#[must_use]
pub fn dedup_ids(ids: &[TaskId]) -> Vec<TaskId> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_keeps_first_seen_order() {
        let ids = [TaskId(3), TaskId(1), TaskId(3), TaskId(2), TaskId(1)];
        assert_eq!(dedup_ids(&ids), vec![TaskId(3), TaskId(1), TaskId(2)]);
    }
}
