use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::task_models::{NewTask, Task, TaskPatch, TaskState};
use crate::domain::Patch;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: Option<i32>,
    pub reminder_at: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub category_id: Option<i32>,
}

impl From<CreateTaskRequest> for NewTask {
    fn from(request: CreateTaskRequest) -> Self {
        NewTask {
            title: request.title,
            description: request.description,
            assigned_to: request.assigned_to,
            reminder_at: request.reminder_at,
            due_date: request.due_date,
            category_id: request.category_id,
        }
    }
}

/// Omitted fields stay unchanged. `null` clears the description, reminder and
/// due date.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub title: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub description: Patch<String>,
    pub assigned_to: Option<i32>,
    pub category_id: Option<i32>,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub reminder_at: Patch<DateTime<Utc>>,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub due_date: Patch<DateTime<Utc>>,
}

impl From<UpdateTaskRequest> for TaskPatch {
    fn from(request: UpdateTaskRequest) -> Self {
        TaskPatch {
            title: request.title,
            description: request.description,
            assigned_to: request.assigned_to,
            category_id: request.category_id,
            reminder_at: request.reminder_at,
            due_date: request.due_date,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TaskListQuery {
    /// Only return tasks assigned to this user id
    pub assigned_to: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaskResponse {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: i32,
    pub reminder_at: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub state: TaskState,
    pub is_overdue: bool,
    pub category_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id().unwrap_or_default(),
            is_completed: task.is_completed(),
            state: task.state(),
            is_overdue: task.is_overdue(),
            title: task.title().to_string(),
            description: task.description().map(str::to_string),
            assigned_to: task.assigned_to(),
            reminder_at: task.reminder_at(),
            due_date: task.due_date(),
            completed_at: task.completed_at(),
            category_id: task.category_id(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}
