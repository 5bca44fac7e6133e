use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bunkmate_common::{AppError, NotificationKind};
use bunkmate_database::Notification;

#[derive(Debug, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub notification_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub related_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl NotificationResponse {
    pub fn from_row(notification: Notification) -> Result<Self, AppError> {
        Ok(Self {
            notification_id: notification.notification_id,
            kind: NotificationKind::parse(&notification.kind).ok_or_else(|| {
                AppError::Internal("Invalid notification kind in database".to_string())
            })?,
            title: notification.title,
            message: notification.message,
            is_read: notification.is_read,
            related_id: notification.related_id,
            created_at: notification.created_at,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub unread_only: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UnreadCountResponse {
    pub unread: i64,
}
