use crate::{
    category::{
        category_dto::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest},
        category_handlers,
        category_models::CategoryColor,
    },
    dto::{PaginatedCategories, PaginatedTasks},
    state::AppState,
    task::{
        task_dto::{CreateTaskRequest, TaskResponse, UpdateTaskRequest},
        task_handlers,
        task_models::TaskState,
    },
};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        category_handlers::get_categories,
        category_handlers::get_paged_categories,
        category_handlers::get_category,
        category_handlers::create_category,
        category_handlers::update_category,
        category_handlers::delete_category,
        category_handlers::get_category_tasks,
        task_handlers::get_tasks,
        task_handlers::get_paged_tasks,
        task_handlers::get_task,
        task_handlers::create_task,
        task_handlers::update_task,
        task_handlers::complete_task,
        task_handlers::delete_task,
    ),
    components(
        schemas(
            CategoryResponse,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CategoryColor,
            TaskResponse,
            CreateTaskRequest,
            UpdateTaskRequest,
            TaskState,
            PaginatedCategories,
            PaginatedTasks,
        )
    ),
    tags(
        (name = "categories", description = "Category management endpoints"),
        (name = "tasks", description = "Task management endpoints")
    )
)]
struct ApiDoc;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let category_routes = Router::new()
        .route(
            "/",
            get(category_handlers::get_categories).post(category_handlers::create_category),
        )
        .route("/paged", get(category_handlers::get_paged_categories))
        .route(
            "/:id",
            get(category_handlers::get_category)
                .patch(category_handlers::update_category)
                .delete(category_handlers::delete_category),
        )
        .route("/:id/tasks", get(category_handlers::get_category_tasks));

    let task_routes = Router::new()
        .route(
            "/",
            get(task_handlers::get_tasks).post(task_handlers::create_task),
        )
        .route("/paged", get(task_handlers::get_paged_tasks))
        .route(
            "/:id",
            get(task_handlers::get_task)
                .patch(task_handlers::update_task)
                .delete(task_handlers::delete_task),
        )
        .route("/:id/complete", post(task_handlers::complete_task));

    let api_routes = Router::new()
        .nest("/categories", category_routes)
        .nest("/tasks", task_routes);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
