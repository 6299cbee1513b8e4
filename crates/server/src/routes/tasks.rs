use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::get,
};
use db::{
    models::{
        task::{CreateTask, Pagination, PaginationMeta, Task, TaskFilter, UpdateTask},
        user::User,
    },
    types::TaskStatus,
};
use serde::{Deserialize, Serialize};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    /// Raw pagination values; anything non-numeric falls back to defaults.
    pub page: Option<String>,
    pub limit: Option<String>,
    #[serde(flatten)]
    pub filter: TaskFilter,
}

/// List envelope carries pagination alongside the page of tasks.
#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub success: bool,
    pub data: Vec<Task>,
    pub pagination: PaginationMeta,
}

pub async fn get_tasks(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<ListTasksQuery>,
) -> Result<ResponseJson<TaskListResponse>, ApiError> {
    let page = Pagination::from_raw(query.page.as_deref(), query.limit.as_deref());
    let result = Task::search_by_owner(&state.db().pool, user.id, &query.filter, page).await?;

    Ok(ResponseJson(TaskListResponse {
        success: true,
        data: result.tasks,
        pagination: result.pagination,
    }))
}

pub async fn get_task(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    let task = Task::find_owned(&state.db().pool, user.id, id).await?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn create_task(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateTask>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Task>>), ApiError> {
    let draft = payload.validate()?;
    let task = Task::create(&state.db().pool, user.id, &draft, Uuid::new_v4()).await?;

    tracing::debug!(task_id = %task.id, "Created task '{}'", task.title);
    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success_with_message(
            task,
            "Task created successfully",
        )),
    ))
}

pub async fn update_task(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTask>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    let pool = &state.db().pool;
    let existing = Task::find_owned(pool, user.id, id).await?;
    let previous_status = existing.status.clone();

    let draft = payload.merge_with(&existing)?;
    let task = Task::update(pool, user.id, id, &draft).await?;

    // Completion mail fires only on the transition into completed, and only
    // for users who opted in. The response never waits on it.
    if task.status == TaskStatus::Completed
        && previous_status != TaskStatus::Completed
        && user.email_notifications
    {
        state.notifier().dispatch_completion(user.clone(), task.clone());
    }

    Ok(ResponseJson(ApiResponse::success_with_message(
        task,
        "Task updated successfully",
    )))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<serde_json::Value>>, ApiError> {
    Task::delete(&state.db().pool, user.id, id).await?;
    Ok(ResponseJson(ApiResponse::success_with_message(
        serde_json::json!({}),
        "Task deleted successfully",
    )))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(get_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
}
