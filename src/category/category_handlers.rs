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
    task::task_dto::TaskResponse,
};
use super::{
    category_dto::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest},
    category_models::CategoryPatch,
};

/// List every category
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "All categories", body = Vec<CategoryResponse>)
    ),
    tag = "categories"
)]
pub async fn get_categories(State(state): State<AppState>) -> Result<Json<Vec<CategoryResponse>>> {
    let categories = state.category_service.list_categories().await?;
    Ok(Json(categories.into_iter().map(CategoryResponse::from).collect()))
}

/// Get one page of categories
#[utoipa::path(
    get,
    path = "/api/categories/paged",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of categories", body = PaginatedCategories),
        (status = 400, description = "Invalid page request")
    ),
    tag = "categories"
)]
pub async fn get_paged_categories(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PaginatedResponse<CategoryResponse>>> {
    let page = query.into_page_request(state.config.default_page_size)?;
    let result = state.category_service.get_paged_categories(page).await?;
    Ok(Json(result.into()))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category", body = CategoryResponse),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CategoryResponse>> {
    let category = state.category_service.get_category(id).await?;
    Ok(Json(category.into()))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Invalid name or color")
    ),
    tag = "categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse> {
    let color = payload.color()?;
    let category = state
        .category_service
        .create_category(&payload.name, payload.description.as_deref(), color)
        .await?;

    Ok((StatusCode::CREATED, Json(CategoryResponse::from(category))))
}

/// Partially update a category
#[utoipa::path(
    patch,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Invalid field value"),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> Result<Json<CategoryResponse>> {
    let patch = CategoryPatch::try_from(payload)?;
    let category = state.category_service.update_category(id, patch).await?;
    Ok(Json(category.into()))
}

/// Delete a category and its tasks
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 204, description = "Category deleted")
    ),
    tag = "categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    state.category_service.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the tasks filed under a category
#[utoipa::path(
    get,
    path = "/api/categories/{id}/tasks",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Tasks in the category", body = Vec<TaskResponse>)
    ),
    tag = "categories"
)]
pub async fn get_category_tasks(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<TaskResponse>>> {
    let tasks = state.task_service.list_tasks_by_category(id).await?;
    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}
