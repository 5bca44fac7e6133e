use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use bunkmate_common::{AppError, BookingStatus};
use bunkmate_database::Booking;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub hostel_id: Uuid,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,

    #[validate(range(min = 1, max = 50))]
    pub guests: i32,

    pub discount_percent: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookingResponse {
    pub booking_id: Uuid,
    pub user_id: Uuid,
    pub owner_id: Uuid,
    pub hostel_id: Uuid,
    pub hostel_name: String,
    pub hostel_image: Option<String>,
    pub hostel_location: String,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub guests: i32,
    pub price_per_night: Decimal,
    pub total_price: Decimal,
    pub discount_percent: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingResponse {
    pub fn from_row(booking: Booking) -> Result<Self, AppError> {
        Ok(Self {
            booking_id: booking.booking_id,
            user_id: booking.user_id,
            owner_id: booking.owner_id,
            hostel_id: booking.hostel_id,
            hostel_name: booking.hostel_name,
            hostel_image: booking.hostel_image,
            hostel_location: booking.hostel_location,
            check_in: booking.check_in,
            check_out: booking.check_out,
            guests: booking.guests,
            price_per_night: booking.price_per_night,
            total_price: booking.total_price,
            discount_percent: booking.discount_percent,
            status: BookingStatus::parse(&booking.status)
                .ok_or_else(|| AppError::Internal("Invalid status in database".to_string()))?,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OwnerStatsResponse {
    pub total_bookings: i64,
    pub pending: i64,
    pub confirmed: i64,
    pub cancelled: i64,
    pub confirmed_revenue: Decimal,
}

// Joined row backing the CSV export.
#[derive(Debug, Clone, FromRow)]
pub struct BookingExportRow {
    pub booking_id: Uuid,
    pub hostel_name: String,
    pub user_email: String,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub total_price: Decimal,
    pub guests: i32,
    pub status: String,
    pub discount_percent: Decimal,
    pub created_at: DateTime<Utc>,
}
