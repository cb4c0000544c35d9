//! `TaskStore` port implementation backed by libSQL.

use async_trait::async_trait;

use kanri_core::entities::{NewTask, Task};
use kanri_core::enums::TaskStatus;
use kanri_core::errors::CoreError;
use kanri_core::ids::TaskId;
use kanri_core::query::{Page, PageRequest, TaskFilter, TaskSort};
use kanri_core::responses::BulkUpdateResponse;
use kanri_core::store::TaskStore;
use kanri_core::updates::TaskUpdate;

use crate::service::KanriService;

#[async_trait]
impl TaskStore for KanriService {
    async fn create_task(&self, new: NewTask) -> Result<Task, CoreError> {
        Ok(Self::create_task(self, new).await?)
    }

    async fn get_task(&self, id: TaskId) -> Result<Task, CoreError> {
        Ok(Self::get_task(self, id).await?)
    }

    async fn update_task(&self, id: TaskId, update: TaskUpdate) -> Result<Task, CoreError> {
        Ok(Self::update_task(self, id, update).await?)
    }

    async fn update_task_status(
        &self,
        id: TaskId,
        status: TaskStatus,
    ) -> Result<Task, CoreError> {
        Ok(Self::update_task_status(self, id, status).await?)
    }

    async fn bulk_update_status(
        &self,
        ids: &[TaskId],
        status: TaskStatus,
    ) -> Result<BulkUpdateResponse, CoreError> {
        let updated_count = Self::bulk_update_status(self, ids, status).await?;
        Ok(BulkUpdateResponse { updated_count })
    }

    async fn list_tasks_by_status(
        &self,
        status: TaskStatus,
        page: PageRequest,
    ) -> Result<Page<Task>, CoreError> {
        Ok(Self::list_tasks_by_status(self, status, page).await?)
    }

    async fn list_tasks(
        &self,
        filter: TaskFilter,
        sort: TaskSort,
        page: PageRequest,
    ) -> Result<Page<Task>, CoreError> {
        Ok(Self::list_tasks(self, &filter, sort, page).await?)
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), CoreError> {
        Ok(Self::delete_task(self, id).await?)
    }
}
