use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use bunkmate_auth::{require_owner, Claims};
use bunkmate_common::{ApiResponse, AppError};

use crate::models::*;
use crate::services::{AppState, BookingService};

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
    Json(ApiResponse::success("Bookings Service is healthy".to_string()))
}

// Booking creation
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Json<ApiResponse<BookingResponse>>, HandlerError> {
    request.validate().map_err(validation_error)?;
    let user_id = claims.user_id().map_err(error_response)?;

    let service = BookingService::new(&state);
    match service.create_booking(user_id, request).await {
        Ok(booking) => Ok(Json(ApiResponse::success(booking))),
        Err(err) => Err(error_response(err)),
    }
}

// Traveler's own bookings
pub async fn list_my_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<BookingResponse>>>, HandlerError> {
    let user_id = claims.user_id().map_err(error_response)?;

    let service = BookingService::new(&state);
    match service.list_user_bookings(user_id).await {
        Ok(bookings) => Ok(Json(ApiResponse::success(bookings))),
        Err(err) => Err(error_response(err)),
    }
}

pub async fn get_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingResponse>>, HandlerError> {
    let service = BookingService::new(&state);
    match service.get_booking(&claims, booking_id).await {
        Ok(booking) => Ok(Json(ApiResponse::success(booking))),
        Err(err) => Err(error_response(err)),
    }
}

// Traveler cancellation
pub async fn cancel_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingResponse>>, HandlerError> {
    let user_id = claims.user_id().map_err(error_response)?;

    let service = BookingService::new(&state);
    match service.cancel_booking(user_id, booking_id).await {
        Ok(booking) => Ok(Json(ApiResponse::success(booking))),
        Err(err) => Err(error_response(err)),
    }
}

// Owner console: approve or decline a pending booking
pub async fn set_booking_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
    Json(request): Json<UpdateBookingStatusRequest>,
) -> Result<Json<ApiResponse<BookingResponse>>, HandlerError> {
    require_owner(&claims).map_err(error_response)?;
    let owner_id = claims.user_id().map_err(error_response)?;

    let service = BookingService::new(&state);
    match service.set_status(owner_id, booking_id, request.status).await {
        Ok(booking) => Ok(Json(ApiResponse::success(booking))),
        Err(err) => Err(error_response(err)),
    }
}

// Owner console: bookings across the owner's hostels
pub async fn list_owner_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<BookingResponse>>>, HandlerError> {
    require_owner(&claims).map_err(error_response)?;
    let owner_id = claims.user_id().map_err(error_response)?;

    let service = BookingService::new(&state);
    match service.list_owner_bookings(owner_id).await {
        Ok(bookings) => Ok(Json(ApiResponse::success(bookings))),
        Err(err) => Err(error_response(err)),
    }
}

// Owner console: revenue aggregates
pub async fn owner_stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<OwnerStatsResponse>>, HandlerError> {
    require_owner(&claims).map_err(error_response)?;
    let owner_id = claims.user_id().map_err(error_response)?;

    let service = BookingService::new(&state);
    match service.owner_stats(owner_id).await {
        Ok(stats) => Ok(Json(ApiResponse::success(stats))),
        Err(err) => Err(error_response(err)),
    }
}

// Owner console: CSV download
pub async fn export_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, HandlerError> {
    require_owner(&claims).map_err(error_response)?;
    let owner_id = claims.user_id().map_err(error_response)?;

    let service = BookingService::new(&state);
    match service.export_owner_bookings(owner_id).await {
        Ok(csv) => Ok((
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"bookings.csv\"",
                ),
            ],
            csv,
        )
            .into_response()),
        Err(err) => Err(error_response(err)),
    }
}
