use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use bunkmate_auth::{require_owner, Claims};
use bunkmate_common::{ApiResponse, AppError};

use crate::filters::HostelFilters;
use crate::models::*;
use crate::services::{AppState, ListingService};

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
    Json(ApiResponse::success("Listings Service is healthy".to_string()))
}

// Search with optional viewer context: anonymous requests see everything,
// signed-in travelers get their blocked hostels filtered out.
pub async fn search_hostels(
    State(state): State<AppState>,
    claims: Option<Extension<Claims>>,
    Query(filters): Query<HostelFilters>,
) -> Result<Json<ApiResponse<Vec<HostelResponse>>>, HandlerError> {
    let viewer = match claims {
        Some(Extension(claims)) => Some(claims.user_id().map_err(error_response)?),
        None => None,
    };

    let service = ListingService::new(&state);
    match service.search_hostels(viewer, &filters).await {
        Ok(hostels) => Ok(Json(ApiResponse::success(hostels))),
        Err(err) => Err(error_response(err)),
    }
}

pub async fn get_hostel(
    State(state): State<AppState>,
    Path(hostel_id): Path<Uuid>,
) -> Result<Json<ApiResponse<HostelResponse>>, HandlerError> {
    let service = ListingService::new(&state);
    match service.get_hostel(hostel_id).await {
        Ok(hostel) => Ok(Json(ApiResponse::success(hostel))),
        Err(err) => Err(error_response(err)),
    }
}

// Owner console: hostel CRUD
pub async fn create_hostel(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<CreateHostelRequest>,
) -> Result<Json<ApiResponse<HostelResponse>>, HandlerError> {
    require_owner(&claims).map_err(error_response)?;
    request.validate().map_err(validation_error)?;
    let owner_id = claims.user_id().map_err(error_response)?;

    let service = ListingService::new(&state);
    match service
        .create_hostel(owner_id, &claims.display_name, request)
        .await
    {
        Ok(hostel) => Ok(Json(ApiResponse::success(hostel))),
        Err(err) => Err(error_response(err)),
    }
}

pub async fn update_hostel(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(hostel_id): Path<Uuid>,
    Json(request): Json<UpdateHostelRequest>,
) -> Result<Json<ApiResponse<HostelResponse>>, HandlerError> {
    require_owner(&claims).map_err(error_response)?;
    request.validate().map_err(validation_error)?;
    let owner_id = claims.user_id().map_err(error_response)?;

    let service = ListingService::new(&state);
    match service.update_hostel(owner_id, hostel_id, request).await {
        Ok(hostel) => Ok(Json(ApiResponse::success(hostel))),
        Err(err) => Err(error_response(err)),
    }
}

pub async fn delete_hostel(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(hostel_id): Path<Uuid>,
) -> Result<Json<ApiResponse<String>>, HandlerError> {
    require_owner(&claims).map_err(error_response)?;
    let owner_id = claims.user_id().map_err(error_response)?;

    let service = ListingService::new(&state);
    match service.delete_hostel(owner_id, hostel_id).await {
        Ok(()) => Ok(Json(ApiResponse::success("Hostel deleted".to_string()))),
        Err(err) => Err(error_response(err)),
    }
}

pub async fn list_owner_hostels(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<HostelResponse>>>, HandlerError> {
    require_owner(&claims).map_err(error_response)?;
    let owner_id = claims.user_id().map_err(error_response)?;

    let service = ListingService::new(&state);
    match service.list_owner_hostels(owner_id).await {
        Ok(hostels) => Ok(Json(ApiResponse::success(hostels))),
        Err(err) => Err(error_response(err)),
    }
}

// Reviews
pub async fn submit_review(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(hostel_id): Path<Uuid>,
    Json(request): Json<CreateReviewRequest>,
) -> Result<Json<ApiResponse<ReviewResponse>>, HandlerError> {
    request.validate().map_err(validation_error)?;
    let user_id = claims.user_id().map_err(error_response)?;

    let service = ListingService::new(&state);
    match service.submit_review(user_id, hostel_id, request).await {
        Ok(review) => Ok(Json(ApiResponse::success(review))),
        Err(err) => Err(error_response(err)),
    }
}

pub async fn list_reviews(
    State(state): State<AppState>,
    Path(hostel_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ReviewResponse>>>, HandlerError> {
    let service = ListingService::new(&state);
    match service.list_reviews(hostel_id).await {
        Ok(reviews) => Ok(Json(ApiResponse::success(reviews))),
        Err(err) => Err(error_response(err)),
    }
}

// Wishlist
pub async fn toggle_wishlist(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<WishlistToggleRequest>,
) -> Result<Json<ApiResponse<WishlistStatusResponse>>, HandlerError> {
    let user_id = claims.user_id().map_err(error_response)?;

    let service = ListingService::new(&state);
    match service.toggle_wishlist(user_id, request.hostel_id).await {
        Ok(status) => Ok(Json(ApiResponse::success(status))),
        Err(err) => Err(error_response(err)),
    }
}

pub async fn list_wishlist(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<WishlistEntryResponse>>>, HandlerError> {
    let user_id = claims.user_id().map_err(error_response)?;

    let service = ListingService::new(&state);
    match service.list_wishlist(user_id).await {
        Ok(entries) => Ok(Json(ApiResponse::success(entries))),
        Err(err) => Err(error_response(err)),
    }
}

pub async fn wishlist_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(hostel_id): Path<Uuid>,
) -> Result<Json<ApiResponse<WishlistStatusResponse>>, HandlerError> {
    let user_id = claims.user_id().map_err(error_response)?;

    let service = ListingService::new(&state);
    match service.wishlist_status(user_id, hostel_id).await {
        Ok(status) => Ok(Json(ApiResponse::success(status))),
        Err(err) => Err(error_response(err)),
    }
}
