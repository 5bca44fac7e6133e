use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Enum-typed columns are stored as TEXT; services convert through the
// bunkmate-common parse/as_str pairs.

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub hashed_password: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub age: Option<i32>,
    pub lifestyle_tags: Vec<String>,
    pub total_spent: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Hostel {
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
    pub meal_policy: String,
    pub gender_policy: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Hostel fields are denormalized at creation time so the booking survives
// later listing edits or deletion.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
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
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Outbox row written in the same transaction as a booking state change.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookingEvent {
    pub event_id: Uuid,
    pub booking_id: Uuid,
    pub event_type: String,
    pub recipient_id: Uuid,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub review_id: Uuid,
    pub hostel_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WishlistEntry {
    pub entry_id: Uuid,
    pub user_id: Uuid,
    pub hostel_id: Uuid,
    pub hostel_name: String,
    pub hostel_image: Option<String>,
    pub hostel_location: String,
    pub price_per_night: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub notification_id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub related_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

// Direct threads normalize (participant_a, participant_b) ordering; support
// threads key on (traveler, owner, hostel).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChatThread {
    pub thread_id: Uuid,
    pub kind: String,
    pub participant_a: Uuid,
    pub participant_b: Uuid,
    pub hostel_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub last_message_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChatMessage {
    pub message_id: Uuid,
    pub thread_id: Uuid,
    pub sender_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BlockedHostel {
    pub user_id: Uuid,
    pub hostel_id: Uuid,
    pub created_at: DateTime<Utc>,
}
