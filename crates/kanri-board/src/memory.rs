//! In-memory `TaskStore`.
//!
//! Mirrors the libSQL service: same validation, same guard, same bulk
//! eligibility, same listing order. It keeps a log of `update_task_status`
//! calls and can be told to delay or fail upcoming ones, which is what the
//! board's reconciliation tests need.

use std::cmp::Ordering;
use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use kanri_core::entities::{NewTask, Task};
use kanri_core::enums::TaskStatus;
use kanri_core::errors::CoreError;
use kanri_core::guard::check_transition;
use kanri_core::ids::TaskId;
use kanri_core::query::{Page, PageRequest, SortDirection, SortField, TaskFilter, TaskSort};
use kanri_core::responses::BulkUpdateResponse;
use kanri_core::store::{TaskStore, dedup_ids};
use kanri_core::updates::TaskUpdate;
use kanri_core::validation::{validate_new_task, validate_update};
use tokio::sync::RwLock;

/// Behavior injected into the next `update_task_status` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fault {
    pub delay: Duration,
    pub fail: bool,
}

impl Fault {
    #[must_use]
    pub const fn fail() -> Self {
        Self {
            delay: Duration::ZERO,
            fail: true,
        }
    }

    #[must_use]
    pub const fn delayed(delay: Duration) -> Self {
        Self { delay, fail: false }
    }

    #[must_use]
    pub const fn and_fail(self) -> Self {
        Self { fail: true, ..self }
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    tasks: BTreeMap<TaskId, Task>,
    last_id: i64,
}

#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    state: RwLock<MemoryState>,
    status_calls: RwLock<Vec<(TaskId, TaskStatus)>>,
    faults: RwLock<VecDeque<Fault>>,
}

impl InMemoryTaskStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a task as-is, bypassing validation. Later creates get ids above
    /// the largest seeded one.
    pub async fn seed(&self, task: Task) {
        let mut state = self.state.write().await;
        state.last_id = state.last_id.max(task.id.get());
        state.tasks.insert(task.id, task);
    }

    /// Queue a fault for the next `update_task_status` call.
    pub async fn push_fault(&self, fault: Fault) {
        self.faults.write().await.push_back(fault);
    }

    pub async fn fail_next_status_updates(&self, count: usize) {
        let mut faults = self.faults.write().await;
        faults.extend(std::iter::repeat_n(Fault::fail(), count));
    }

    /// Every `update_task_status` call received, in arrival order.
    pub async fn status_updates(&self) -> Vec<(TaskId, TaskStatus)> {
        self.status_calls.read().await.clone()
    }

    pub async fn status_update_calls(&self) -> usize {
        self.status_calls.read().await.len()
    }

    /// Number of stored tasks per status.
    pub async fn count(&self, status: TaskStatus) -> usize {
        self.state
            .read()
            .await
            .tasks
            .values()
            .filter(|t| t.status == status)
            .count()
    }
}

fn filter_matches(filter: &TaskFilter, task: &Task) -> bool {
    if filter.status.is_some_and(|s| s != task.status) {
        return false;
    }
    if filter.priority.is_some_and(|p| p != task.priority) {
        return false;
    }
    if filter
        .patient_id
        .as_deref()
        .is_some_and(|p| task.patient_id.as_deref() != Some(p))
    {
        return false;
    }
    if filter
        .owner_id
        .as_deref()
        .is_some_and(|o| task.owner_id != o)
    {
        return false;
    }
    if filter.due_from.is_some_and(|d| task.due_date < d) {
        return false;
    }
    if filter.due_to.is_some_and(|d| task.due_date > d) {
        return false;
    }
    if let Some(term) = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        let term = term.to_lowercase();
        let hit = task.title.to_lowercase().contains(&term)
            || task
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&term));
        if !hit {
            return false;
        }
    }
    true
}

fn compare(sort: TaskSort, a: &Task, b: &Task) -> Ordering {
    let ordering = match sort.field {
        SortField::DueDate => a.due_date.cmp(&b.due_date),
        SortField::Priority => a.priority.rank().cmp(&b.priority.rank()),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortField::Status => a.status.cmp(&b.status),
    };
    let ordering = match sort.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    };
    ordering.then(a.id.cmp(&b.id))
}

fn page_of(mut tasks: Vec<Task>, sort: TaskSort, page: PageRequest) -> Page<Task> {
    tasks.sort_by(|a, b| compare(sort, a, b));
    let total = tasks.len() as u64;
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let items = tasks
        .into_iter()
        .skip(offset)
        .take(page.per_page as usize)
        .collect();
    Page::new(items, page, total)
}

fn apply_update(task: &mut Task, update: TaskUpdate) {
    if let Some(title) = update.title {
        task.title = title.trim().to_string();
    }
    if let Some(description) = update.description {
        task.description = description;
    }
    if let Some(priority) = update.priority {
        task.priority = priority;
    }
    if let Some(status) = update.status {
        task.status = status;
    }
    if let Some(start_date) = update.start_date {
        task.start_date = start_date;
    }
    if let Some(due_date) = update.due_date {
        task.due_date = due_date;
    }
    if let Some(patient_id) = update.patient_id {
        task.patient_id = patient_id;
    }
    task.updated_at = Utc::now();
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create_task(&self, new: NewTask) -> Result<Task, CoreError> {
        let draft = validate_new_task(new)?;
        let mut state = self.state.write().await;
        state.last_id += 1;
        let now = Utc::now();
        let task = Task {
            id: TaskId(state.last_id),
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            status: draft.status,
            start_date: draft.start_date,
            due_date: draft.due_date,
            patient_id: draft.patient_id,
            owner_id: draft.owner_id,
            created_at: now,
            updated_at: now,
        };
        state.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn get_task(&self, id: TaskId) -> Result<Task, CoreError> {
        self.state
            .read()
            .await
            .tasks
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::task_not_found(id))
    }

    async fn update_task(&self, id: TaskId, update: TaskUpdate) -> Result<Task, CoreError> {
        let mut state = self.state.write().await;
        let task = state
            .tasks
            .get_mut(&id)
            .ok_or_else(|| CoreError::task_not_found(id))?;
        validate_update(task, &update)?;
        if update.is_empty() {
            return Ok(task.clone());
        }
        apply_update(task, update);
        Ok(task.clone())
    }

    async fn update_task_status(
        &self,
        id: TaskId,
        status: TaskStatus,
    ) -> Result<Task, CoreError> {
        self.status_calls.write().await.push((id, status));
        let fault = self.faults.write().await.pop_front().unwrap_or_default();
        if !fault.delay.is_zero() {
            tokio::time::sleep(fault.delay).await;
        }
        if fault.fail {
            return Err(anyhow::anyhow!("store unavailable").into());
        }

        let mut state = self.state.write().await;
        let task = state
            .tasks
            .get_mut(&id)
            .ok_or_else(|| CoreError::task_not_found(id))?;
        check_transition(id, task.status, status)?;
        if task.status != status {
            task.status = status;
            task.updated_at = Utc::now();
        }
        Ok(task.clone())
    }

    async fn bulk_update_status(
        &self,
        ids: &[TaskId],
        status: TaskStatus,
    ) -> Result<BulkUpdateResponse, CoreError> {
        if status.is_system_assigned() {
            return Err(CoreError::invalid(
                "status",
                format!("{status} is assigned by the system"),
            ));
        }

        let mut state = self.state.write().await;
        let now = Utc::now();
        let mut updated_count = 0;
        for id in dedup_ids(ids) {
            if let Some(task) = state.tasks.get_mut(&id) {
                if task.status.is_bulk_eligible(status) {
                    task.status = status;
                    task.updated_at = now;
                    updated_count += 1;
                }
            }
        }
        Ok(BulkUpdateResponse { updated_count })
    }

    async fn list_tasks_by_status(
        &self,
        status: TaskStatus,
        page: PageRequest,
    ) -> Result<Page<Task>, CoreError> {
        self.list_tasks(TaskFilter::by_status(status), TaskSort::default(), page)
            .await
    }

    async fn list_tasks(
        &self,
        filter: TaskFilter,
        sort: TaskSort,
        page: PageRequest,
    ) -> Result<Page<Task>, CoreError> {
        let state = self.state.read().await;
        let tasks = state
            .tasks
            .values()
            .filter(|t| filter_matches(&filter, t))
            .cloned()
            .collect();
        Ok(page_of(tasks, sort, page))
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), CoreError> {
        self.state
            .write()
            .await
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| CoreError::task_not_found(id))
    }
}
