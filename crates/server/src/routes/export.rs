use axum::{
    Extension, Router,
    extract::State,
    http::header,
    response::{IntoResponse, Json as ResponseJson, Response},
    routing::get,
};
use db::models::{task::Task, user::User};
use services::services::export;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

fn attachment_response(content_type: &'static str, filename: &str, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={filename}"),
            ),
        ],
        body,
    )
        .into_response()
}

pub async fn export_csv(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Response, ApiError> {
    let tasks = Task::find_all_by_owner(&state.db().pool, user.id).await?;
    let bytes = export::tasks_to_csv(&tasks)?;
    Ok(attachment_response("text/csv", "tasks.csv", bytes))
}

pub async fn export_json(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Response, ApiError> {
    let tasks = Task::find_all_by_owner(&state.db().pool, user.id).await?;
    let bytes = export::tasks_to_json(&tasks)?;
    Ok(attachment_response("application/json", "tasks.json", bytes))
}

pub async fn export_pdf(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Response, ApiError> {
    let tasks = Task::find_all_by_owner(&state.db().pool, user.id).await?;
    let bytes = export::tasks_to_pdf(&tasks)?;
    Ok(attachment_response("application/pdf", "tasks.pdf", bytes))
}

pub async fn task_report(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<ResponseJson<ApiResponse<export::TaskReport>>, ApiError> {
    let tasks = Task::find_all_by_owner(&state.db().pool, user.id).await?;
    Ok(ResponseJson(ApiResponse::success(export::build_report(
        &tasks,
    ))))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/export/tasks/csv", get(export_csv))
        .route("/export/tasks/json", get(export_json))
        .route("/export/tasks/pdf", get(export_pdf))
        .route("/export/report", get(task_report))
}
