use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    dto::{PageQuery, PaginatedResponse},
    error::Result,
    state::AppState,
};
use super::{
    task_dto::{CreateTaskRequest, TaskListQuery, TaskResponse, UpdateTaskRequest},
    task_models::TaskPatch,
};

/// List tasks, optionally only those assigned to one user
#[utoipa::path(
    get,
    path = "/api/tasks",
    params(TaskListQuery),
    responses(
        (status = 200, description = "List of tasks", body = Vec<TaskResponse>)
    ),
    tag = "tasks"
)]
pub async fn get_tasks(
    State(state): State<AppState>,
    Query(query): Query<TaskListQuery>,
) -> Result<Json<Vec<TaskResponse>>> {
    let tasks = match query.assigned_to {
        Some(assigned_to) => state.task_service.list_tasks_by_assignee(assigned_to).await?,
        None => state.task_service.list_tasks().await?,
    };

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// Get one page of tasks
#[utoipa::path(
    get,
    path = "/api/tasks/paged",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of tasks", body = PaginatedTasks),
        (status = 400, description = "Invalid page request")
    ),
    tag = "tasks"
)]
pub async fn get_paged_tasks(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PaginatedResponse<TaskResponse>>> {
    let page = query.into_page_request(state.config.default_page_size)?;
    let result = state.task_service.get_paged_tasks(page).await?;
    Ok(Json(result.into()))
}

#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    params(("id" = i32, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task", body = TaskResponse),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks"
)]
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TaskResponse>> {
    let task = state.task_service.get_task(id).await?;
    Ok(Json(task.into()))
}

#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Invalid title or description")
    ),
    tag = "tasks"
)]
pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse> {
    let task = state.task_service.create_task(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(TaskResponse::from(task))))
}

/// Partially update a task
#[utoipa::path(
    patch,
    path = "/api/tasks/{id}",
    params(("id" = i32, Path, description = "Task id")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = TaskResponse),
        (status = 400, description = "Invalid field value"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks"
)]
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>> {
    let task = state
        .task_service
        .update_task(id, TaskPatch::from(payload))
        .await?;
    Ok(Json(task.into()))
}

/// Mark a task as completed
#[utoipa::path(
    post,
    path = "/api/tasks/{id}/complete",
    params(("id" = i32, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task completed", body = TaskResponse),
        (status = 404, description = "Task not found"),
        (status = 409, description = "Task is already completed")
    ),
    tag = "tasks"
)]
pub async fn complete_task(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TaskResponse>> {
    let task = state.task_service.complete_task(id).await?;
    Ok(Json(task.into()))
}

#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(("id" = i32, Path, description = "Task id")),
    responses(
        (status = 204, description = "Task deleted")
    ),
    tag = "tasks"
)]
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    state.task_service.delete_task(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
