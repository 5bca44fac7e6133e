use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use uuid::Uuid;

use bunkmate_auth::Claims;
use bunkmate_common::{ApiResponse, AppError};

use crate::models::*;
use crate::services::{AppState, NotificationService};

type HandlerError = (StatusCode, Json<ApiResponse<()>>);

fn error_response(err: AppError) -> HandlerError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        tracing::error!("Request failed: {:?}", err);
    }
    (status, Json(ApiResponse::error(err.to_string())))
}

// Health check
pub async fn health_check() -> Json<ApiResponse<String>> {
    Json(ApiResponse::success(
        "Notifications Service is healthy".to_string(),
    ))
}

pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<ApiResponse<Vec<NotificationResponse>>>, HandlerError> {
    let user_id = claims.user_id().map_err(error_response)?;

    let service = NotificationService::new(&state);
    match service
        .list_notifications(user_id, query.unread_only.unwrap_or(false))
        .await
    {
        Ok(notifications) => Ok(Json(ApiResponse::success(notifications))),
        Err(err) => Err(error_response(err)),
    }
}

pub async fn mark_read(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(notification_id): Path<Uuid>,
) -> Result<Json<ApiResponse<String>>, HandlerError> {
    let user_id = claims.user_id().map_err(error_response)?;

    let service = NotificationService::new(&state);
    match service.mark_read(user_id, notification_id).await {
        Ok(()) => Ok(Json(ApiResponse::success("Notification marked read".to_string()))),
        Err(err) => Err(error_response(err)),
    }
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<u64>>, HandlerError> {
    let user_id = claims.user_id().map_err(error_response)?;

    let service = NotificationService::new(&state);
    match service.mark_all_read(user_id).await {
        Ok(updated) => Ok(Json(ApiResponse::success(updated))),
        Err(err) => Err(error_response(err)),
    }
}

pub async fn unread_count(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<UnreadCountResponse>>, HandlerError> {
    let user_id = claims.user_id().map_err(error_response)?;

    let service = NotificationService::new(&state);
    match service.unread_count(user_id).await {
        Ok(count) => Ok(Json(ApiResponse::success(count))),
        Err(err) => Err(error_response(err)),
    }
}
