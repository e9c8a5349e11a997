use std::sync::Arc;

use crate::category::category_repository::CategoryRepository;
use crate::domain::{DomainError, PageRequest, PagedResult};
use crate::error::{AppError, Result};
use crate::task::task_models::{NewTask, Task, TaskPatch};
use crate::task::task_repository::TaskRepository;

/// Service layer for task‑related business logic.
#[derive(Clone)]
pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl TaskService {
    pub fn new(repo: Arc<dyn TaskRepository>, categories: Arc<dyn CategoryRepository>) -> Self {
        Self { repo, categories }
    }

    /// Category 0 means uncategorised; any other id must name a stored category.
    async fn ensure_category_exists(&self, category_id: i32) -> Result<()> {
        if category_id == 0 || self.categories.exists(category_id).await? {
            return Ok(());
        }
        Err(DomainError::validation(
            "category_id",
            format!("Category {} does not exist", category_id),
        )
        .into())
    }

    pub async fn create_task(&self, request: NewTask) -> Result<Task> {
        let task = Task::create(request)?;
        self.ensure_category_exists(task.category_id()).await?;
        let task = self.repo.add(task).await?;
        tracing::info!("Created task {:?}: {}", task.id(), task.title());
        Ok(task)
    }

    pub async fn get_task(&self, id: i32) -> Result<Task> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.repo.get_all().await
    }

    pub async fn list_tasks_by_category(&self, category_id: i32) -> Result<Vec<Task>> {
        self.repo.get_by_category(category_id).await
    }

    pub async fn list_tasks_by_assignee(&self, assigned_to: i32) -> Result<Vec<Task>> {
        self.repo.get_by_assignee(assigned_to).await
    }

    pub async fn get_paged_tasks(&self, page: PageRequest) -> Result<PagedResult<Task>> {
        self.repo.get_paged(page).await
    }

    pub async fn update_task(&self, id: i32, patch: TaskPatch) -> Result<Task> {
        let mut task = self.get_task(id).await?;
        if let Some(category_id) = patch.category_id {
            self.ensure_category_exists(category_id).await?;
        }
        task.update(&patch)?;
        self.repo.update(&task).await?;
        tracing::info!("Updated task {}", id);
        Ok(task)
    }

    pub async fn complete_task(&self, id: i32) -> Result<Task> {
        let mut task = self.get_task(id).await?;
        task.complete()?;
        self.repo.update(&task).await?;
        tracing::info!("Task {} ({}) is now {}", id, task.title(), task.state());
        Ok(task)
    }

    pub async fn delete_task(&self, id: i32) -> Result<()> {
        if !self.repo.exists(id).await? {
            tracing::debug!("Task {} does not exist, nothing to delete", id);
            return Ok(());
        }
        self.repo.delete(id).await?;
        tracing::info!("Deleted task {}", id);
        Ok(())
    }
}
