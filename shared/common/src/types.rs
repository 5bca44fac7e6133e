use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Owner,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Owner => "owner",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(UserRole::User),
            "owner" => Some(UserRole::Owner),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(UserStatus::Active),
            "inactive" => Some(UserStatus::Inactive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

// Outbox event types written alongside booking state transitions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingEventType {
    Created,
    Confirmed,
    Cancelled,
}

impl BookingEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingEventType::Created => "created",
            BookingEventType::Confirmed => "confirmed",
            BookingEventType::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "created" => Some(BookingEventType::Created),
            "confirmed" => Some(BookingEventType::Confirmed),
            "cancelled" => Some(BookingEventType::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Booking,
    Offer,
    Chat,
    OwnerBookingRequest,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Booking => "booking",
            NotificationKind::Offer => "offer",
            NotificationKind::Chat => "chat",
            NotificationKind::OwnerBookingRequest => "owner_booking_request",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "booking" => Some(NotificationKind::Booking),
            "offer" => Some(NotificationKind::Offer),
            "chat" => Some(NotificationKind::Chat),
            "owner_booking_request" => Some(NotificationKind::OwnerBookingRequest),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatThreadKind {
    Direct,
    Support,
}

impl ChatThreadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatThreadKind::Direct => "direct",
            ChatThreadKind::Support => "support",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "direct" => Some(ChatThreadKind::Direct),
            "support" => Some(ChatThreadKind::Support),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MealPolicy {
    NoMeals,
    BreakfastOnly,
    HalfBoard,
    FullBoard,
}

impl MealPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealPolicy::NoMeals => "no_meals",
            MealPolicy::BreakfastOnly => "breakfast_only",
            MealPolicy::HalfBoard => "half_board",
            MealPolicy::FullBoard => "full_board",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "no_meals" => Some(MealPolicy::NoMeals),
            "breakfast_only" => Some(MealPolicy::BreakfastOnly),
            "half_board" => Some(MealPolicy::HalfBoard),
            "full_board" => Some(MealPolicy::FullBoard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GenderPolicy {
    Mixed,
    MaleOnly,
    FemaleOnly,
}

impl GenderPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenderPolicy::Mixed => "mixed",
            GenderPolicy::MaleOnly => "male_only",
            GenderPolicy::FemaleOnly => "female_only",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "mixed" => Some(GenderPolicy::Mixed),
            "male_only" => Some(GenderPolicy::MaleOnly),
            "female_only" => Some(GenderPolicy::FemaleOnly),
            _ => None,
        }
    }
}

// Common response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_storage_strings() {
        for role in [UserRole::User, UserRole::Owner] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::parse("admin"), None);
    }

    #[test]
    fn notification_kind_uses_snake_case_wire_values() {
        assert_eq!(
            NotificationKind::OwnerBookingRequest.as_str(),
            "owner_booking_request"
        );
        assert_eq!(
            NotificationKind::parse("owner_booking_request"),
            Some(NotificationKind::OwnerBookingRequest)
        );
    }

    #[test]
    fn booking_status_rejects_unknown_values() {
        assert_eq!(BookingStatus::parse("pending"), Some(BookingStatus::Pending));
        assert_eq!(BookingStatus::parse("expired"), None);
    }
}
