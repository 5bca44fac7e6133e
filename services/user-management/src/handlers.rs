use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use bunkmate_auth::{require_owner, Claims};
use bunkmate_common::{ApiResponse, AppError};

use crate::models::*;
use crate::services::{AppState, UserService};

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
    Json(ApiResponse::success(
        "User Management Service is healthy".to_string(),
    ))
}

// Registration
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, HandlerError> {
    request.validate().map_err(validation_error)?;

    let user_service = UserService::new(&state);
    match user_service.register_user(request).await {
        Ok(response) => Ok(Json(ApiResponse::success(response))),
        Err(err) => Err(error_response(err)),
    }
}

// Login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, HandlerError> {
    request.validate().map_err(validation_error)?;

    let user_service = UserService::new(&state);
    match user_service.login_user(request).await {
        Ok(response) => Ok(Json(ApiResponse::success(response))),
        Err(err) => Err(error_response(err)),
    }
}

// Logout
pub async fn logout(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<String>>, HandlerError> {
    let user_id = claims.user_id().map_err(error_response)?;

    let user_service = UserService::new(&state);
    match user_service.logout_user(user_id).await {
        Ok(()) => Ok(Json(ApiResponse::success("Logged out successfully".to_string()))),
        Err(err) => Err(error_response(err)),
    }
}

// Current user
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<ProfileResponse>>, HandlerError> {
    let user_id = claims.user_id().map_err(error_response)?;

    let user_service = UserService::new(&state);
    match user_service.get_profile(user_id).await {
        Ok(profile) => Ok(Json(ApiResponse::success(profile))),
        Err(err) => Err(error_response(err)),
    }
}

// Password reset
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(request): Json<PasswordResetRequest>,
) -> Result<Json<ApiResponse<String>>, HandlerError> {
    request.validate().map_err(validation_error)?;

    let user_service = UserService::new(&state);
    match user_service.request_password_reset(&request.email).await {
        Ok(()) => Ok(Json(ApiResponse::success(
            "If the address exists, a reset link has been sent".to_string(),
        ))),
        Err(err) => Err(error_response(err)),
    }
}

pub async fn confirm_password_reset(
    State(state): State<AppState>,
    Json(request): Json<PasswordResetConfirmRequest>,
) -> Result<Json<ApiResponse<String>>, HandlerError> {
    request.validate().map_err(validation_error)?;

    let user_service = UserService::new(&state);
    match user_service.confirm_password_reset(request).await {
        Ok(()) => Ok(Json(ApiResponse::success("Password updated".to_string()))),
        Err(err) => Err(error_response(err)),
    }
}

// Profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<ProfileResponse>>, HandlerError> {
    request.validate().map_err(validation_error)?;
    let user_id = claims.user_id().map_err(error_response)?;

    let user_service = UserService::new(&state);
    match user_service.update_profile(user_id, request).await {
        Ok(profile) => Ok(Json(ApiResponse::success(profile))),
        Err(err) => Err(error_response(err)),
    }
}

// Owner console: list users
pub async fn list_users(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<UserSummary>>>, HandlerError> {
    require_owner(&claims).map_err(error_response)?;

    let user_service = UserService::new(&state);
    match user_service.list_users().await {
        Ok(users) => Ok(Json(ApiResponse::success(users))),
        Err(err) => Err(error_response(err)),
    }
}

// Owner console: activate/deactivate a user
pub async fn set_user_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<SetUserStatusRequest>,
) -> Result<Json<ApiResponse<String>>, HandlerError> {
    require_owner(&claims).map_err(error_response)?;

    let user_service = UserService::new(&state);
    match user_service.set_user_status(user_id, request.status).await {
        Ok(()) => Ok(Json(ApiResponse::success("User status updated".to_string()))),
        Err(err) => Err(error_response(err)),
    }
}

// Hostel blocking
pub async fn block_hostel(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(hostel_id): Path<Uuid>,
) -> Result<Json<ApiResponse<String>>, HandlerError> {
    let user_id = claims.user_id().map_err(error_response)?;

    let user_service = UserService::new(&state);
    match user_service.block_hostel(user_id, hostel_id).await {
        Ok(()) => Ok(Json(ApiResponse::success("Hostel blocked".to_string()))),
        Err(err) => Err(error_response(err)),
    }
}

pub async fn unblock_hostel(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(hostel_id): Path<Uuid>,
) -> Result<Json<ApiResponse<String>>, HandlerError> {
    let user_id = claims.user_id().map_err(error_response)?;

    let user_service = UserService::new(&state);
    match user_service.unblock_hostel(user_id, hostel_id).await {
        Ok(()) => Ok(Json(ApiResponse::success("Hostel unblocked".to_string()))),
        Err(err) => Err(error_response(err)),
    }
}

pub async fn list_blocked_hostels(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<BlockedHostelResponse>>>, HandlerError> {
    let user_id = claims.user_id().map_err(error_response)?;

    let user_service = UserService::new(&state);
    match user_service.list_blocked_hostels(user_id).await {
        Ok(blocked) => Ok(Json(ApiResponse::success(blocked))),
        Err(err) => Err(error_response(err)),
    }
}
