use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use bunkmate_auth::Claims;
use bunkmate_common::{ApiResponse, AppError};

use crate::models::*;
use crate::services::{AppState, ChatService};

type HandlerError = (StatusCode, Json<ApiResponse<()>>);

fn error_response(err: AppError) -> HandlerError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        tracing::error!("Request failed: {:?}", err);
    }
    (status, Json(ApiResponse::error(err.to_string())))
}

fn validation_error(errors: validator::ValidationErrors) -> HandlerError {
    error_response(AppError::Validation(format!("{}", errors)))
}

// Health check
pub async fn health_check() -> Json<ApiResponse<String>> {
    Json(ApiResponse::success("Chat Service is healthy".to_string()))
}

// Start or continue a conversation by recipient or hostel
pub async fn send_message(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, HandlerError> {
    request.validate().map_err(validation_error)?;

    let service = ChatService::new(&state);
    match service.send_message(&claims, request).await {
        Ok(message) => Ok(Json(ApiResponse::success(message))),
        Err(err) => Err(error_response(err)),
    }
}

// Reply inside an existing thread
pub async fn reply(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(thread_id): Path<Uuid>,
    Json(request): Json<ReplyRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, HandlerError> {
    request.validate().map_err(validation_error)?;

    let service = ChatService::new(&state);
    match service.reply(&claims, thread_id, request).await {
        Ok(message) => Ok(Json(ApiResponse::success(message))),
        Err(err) => Err(error_response(err)),
    }
}

// Caller's threads, most recently active first
pub async fn list_threads(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<ThreadResponse>>>, HandlerError> {
    let user_id = claims.user_id().map_err(error_response)?;

    let service = ChatService::new(&state);
    match service.list_threads(user_id).await {
        Ok(threads) => Ok(Json(ApiResponse::success(threads))),
        Err(err) => Err(error_response(err)),
    }
}

// Message history in creation order
pub async fn get_messages(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(thread_id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<MessageResponse>>>, HandlerError> {
    let user_id = claims.user_id().map_err(error_response)?;

    let service = ChatService::new(&state);
    match service.get_messages(user_id, thread_id, &query).await {
        Ok(messages) => Ok(Json(ApiResponse::success(messages))),
        Err(err) => Err(error_response(err)),
    }
}
