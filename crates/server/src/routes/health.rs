use axum::response::Json as ResponseJson;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utils::response::ApiResponse;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub timestamp: DateTime<Utc>,
}

pub async fn health_check() -> ResponseJson<ApiResponse<HealthStatus>> {
    ResponseJson(ApiResponse::success_with_message(
        HealthStatus {
            timestamp: Utc::now(),
        },
        "Server is running",
    ))
}
