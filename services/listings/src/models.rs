use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use bunkmate_common::{AppError, GenderPolicy, MealPolicy};
use bunkmate_database::{Hostel, Review, WishlistEntry};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateHostelRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(min = 1, max = 200))]
    pub location: String,

    // Positivity is checked in the service; validator has no Decimal support
    pub price_per_night: Decimal,

    #[validate(range(min = 1))]
    pub capacity: i32,

    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub wifi_speed_mbps: Option<i32>,
    pub meal_policy: Option<MealPolicy>,
    pub gender_policy: Option<GenderPolicy>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateHostelRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,

    pub price_per_night: Option<Decimal>,
    pub capacity: Option<i32>,
    pub amenities: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub wifi_speed_mbps: Option<i32>,
    pub meal_policy: Option<MealPolicy>,
    pub gender_policy: Option<GenderPolicy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostelResponse {
    pub hostel_id: Uuid,
    pub name: String,
    pub location: String,
    pub price_per_night: Decimal,
    pub rating: Decimal,
    pub review_count: i32,
    pub capacity: i32,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub owner_id: Uuid,
    pub owner_name: String,
    pub wifi_speed_mbps: Option<i32>,
    pub meal_policy: MealPolicy,
    pub gender_policy: GenderPolicy,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HostelResponse {
    pub fn from_row(hostel: Hostel) -> Result<Self, AppError> {
        Ok(Self {
            hostel_id: hostel.hostel_id,
            name: hostel.name,
            location: hostel.location,
            price_per_night: hostel.price_per_night,
            rating: hostel.rating,
            review_count: hostel.review_count,
            capacity: hostel.capacity,
            amenities: hostel.amenities,
            images: hostel.images,
            owner_id: hostel.owner_id,
            owner_name: hostel.owner_name,
            wifi_speed_mbps: hostel.wifi_speed_mbps,
            meal_policy: MealPolicy::parse(&hostel.meal_policy)
                .ok_or_else(|| AppError::Internal("Invalid meal policy in database".to_string()))?,
            gender_policy: GenderPolicy::parse(&hostel.gender_policy).ok_or_else(|| {
                AppError::Internal("Invalid gender policy in database".to_string())
            })?,
            created_at: hostel.created_at,
            updated_at: hostel.updated_at,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,

    #[validate(length(min = 1, max = 2000))]
    pub comment: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub review_id: Uuid,
    pub hostel_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            review_id: review.review_id,
            hostel_id: review.hostel_id,
            user_id: review.user_id,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WishlistToggleRequest {
    pub hostel_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WishlistStatusResponse {
    pub hostel_id: Uuid,
    pub wishlisted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WishlistEntryResponse {
    pub entry_id: Uuid,
    pub hostel_id: Uuid,
    pub hostel_name: String,
    pub hostel_image: Option<String>,
    pub hostel_location: String,
    pub price_per_night: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<WishlistEntry> for WishlistEntryResponse {
    fn from(entry: WishlistEntry) -> Self {
        Self {
            entry_id: entry.entry_id,
            hostel_id: entry.hostel_id,
            hostel_name: entry.hostel_name,
            hostel_image: entry.hostel_image,
            hostel_location: entry.hostel_location,
            price_per_night: entry.price_per_night,
            created_at: entry.created_at,
        }
    }
}
