use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::task_models::{PersistedTask, Task};
use crate::{
    category::category_repository::persisted_id,
    domain::{PageRequest, PagedResult},
    error::{AppError, Result},
};

/// Storage contract for tasks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn get_by_id(&self, id: i32) -> Result<Option<Task>>;

    /// All tasks ordered by id.
    async fn get_all(&self) -> Result<Vec<Task>>;

    async fn get_by_category(&self, category_id: i32) -> Result<Vec<Task>>;

    async fn get_by_assignee(&self, assigned_to: i32) -> Result<Vec<Task>>;

    async fn get_paged(&self, page: PageRequest) -> Result<PagedResult<Task>>;

    /// Stores a new task and returns it with its assigned id.
    async fn add(&self, task: Task) -> Result<Task>;

    async fn update(&self, task: &Task) -> Result<()>;

    /// Removes a task. Missing ids are ignored.
    async fn delete(&self, id: i32) -> Result<()>;

    async fn exists(&self, id: i32) -> Result<bool>;
}

/// Column list for `tasks` queries. A NULL category reads back as 0.
const TASK_COLUMNS: &str = "\
    id, title, description, assigned_to, reminder_at, is_completed, \
    due_date, completed_at, COALESCE(category_id, 0) AS category_id, \
    created_at, updated_at";

#[derive(Debug, FromRow)]
struct TaskRow {
    id: i32,
    title: String,
    description: Option<String>,
    assigned_to: i32,
    reminder_at: Option<DateTime<Utc>>,
    is_completed: bool,
    due_date: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    category_id: i32,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<TaskRow> for Task {
    type Error = AppError;

    fn try_from(row: TaskRow) -> Result<Self> {
        Task::from_persisted(PersistedTask {
            id: row.id,
            title: row.title,
            description: row.description,
            assigned_to: row.assigned_to,
            reminder_at: row.reminder_at,
            is_completed: row.is_completed,
            due_date: row.due_date,
            completed_at: row.completed_at,
            category_id: row.category_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
        .map_err(|e| AppError::Database(sqlx::Error::Decode(Box::new(e))))
    }
}

fn into_tasks(rows: Vec<TaskRow>) -> Result<Vec<Task>> {
    rows.into_iter().map(Task::try_from).collect()
}

#[derive(Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn get_by_id(&self, id: i32) -> Result<Option<Task>> {
        let query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1");
        let row = sqlx::query_as::<_, TaskRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Task::try_from).transpose()
    }

    async fn get_all(&self) -> Result<Vec<Task>> {
        let query = format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY id");
        let rows = sqlx::query_as::<_, TaskRow>(&query)
            .fetch_all(&self.pool)
            .await?;

        into_tasks(rows)
    }

    async fn get_by_category(&self, category_id: i32) -> Result<Vec<Task>> {
        let query = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE COALESCE(category_id, 0) = $1 ORDER BY id"
        );
        let rows = sqlx::query_as::<_, TaskRow>(&query)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;

        into_tasks(rows)
    }

    async fn get_by_assignee(&self, assigned_to: i32) -> Result<Vec<Task>> {
        let query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE assigned_to = $1 ORDER BY id");
        let rows = sqlx::query_as::<_, TaskRow>(&query)
            .bind(assigned_to)
            .fetch_all(&self.pool)
            .await?;

        into_tasks(rows)
    }

    async fn get_paged(&self, page: PageRequest) -> Result<PagedResult<Task>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks")
            .fetch_one(&self.pool)
            .await?;

        let query = format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY id LIMIT $1 OFFSET $2");
        let rows = sqlx::query_as::<_, TaskRow>(&query)
            .bind(i64::from(page.page_size()))
            .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        Ok(PagedResult::new(into_tasks(rows)?, total.max(0) as u64, page))
    }

    async fn add(&self, mut task: Task) -> Result<Task> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO tasks (
                title, description, assigned_to, reminder_at, is_completed,
                due_date, completed_at, category_id, created_at, updated_at
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, NULLIF($8, 0), $9, $10)
             RETURNING id",
        )
        .bind(task.title())
        .bind(task.description())
        .bind(task.assigned_to())
        .bind(task.reminder_at())
        .bind(task.is_completed())
        .bind(task.due_date())
        .bind(task.completed_at())
        .bind(task.category_id())
        .bind(task.created_at())
        .bind(task.updated_at())
        .fetch_one(&self.pool)
        .await?;

        task.assign_id(id);
        Ok(task)
    }

    async fn update(&self, task: &Task) -> Result<()> {
        let id = persisted_id("task", task.id())?;

        sqlx::query(
            "UPDATE tasks SET
                title = $1,
                description = $2,
                assigned_to = $3,
                reminder_at = $4,
                is_completed = $5,
                due_date = $6,
                completed_at = $7,
                category_id = NULLIF($8, 0),
                updated_at = $9
             WHERE id = $10",
        )
        .bind(task.title())
        .bind(task.description())
        .bind(task.assigned_to())
        .bind(task.reminder_at())
        .bind(task.is_completed())
        .bind(task.due_date())
        .bind(task.completed_at())
        .bind(task.category_id())
        .bind(task.updated_at())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn exists(&self, id: i32) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tasks WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}
