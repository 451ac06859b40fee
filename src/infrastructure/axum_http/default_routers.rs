use axum::{Json, http::StatusCode, response::IntoResponse};
use tracing::info;

use crate::infrastructure::axum_http::error_responses::ErrorResponse;

pub async fn not_found() -> impl IntoResponse {
    info!("default router: not_found handler invoked");
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            code: StatusCode::NOT_FOUND.as_u16(),
            error: "not found".to_string(),
        }),
    )
}

pub async fn health_check() -> impl IntoResponse {
    info!("default router: health_check handler invoked");
    (StatusCode::OK, "OK")
}
