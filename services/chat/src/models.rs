use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use bunkmate_common::{AppError, ChatThreadKind};
use bunkmate_database::{ChatMessage, ChatThread};

// Starting (or continuing) a conversation: exactly one of recipient_id
// (direct thread) or hostel_id (support thread routed to the hostel owner).
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 4000))]
    pub body: String,

    pub recipient_id: Option<Uuid>,
    pub hostel_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ReplyRequest {
    #[validate(length(min = 1, max = 4000))]
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThreadResponse {
    pub thread_id: Uuid,
    pub kind: ChatThreadKind,
    pub participant_a: Uuid,
    pub participant_b: Uuid,
    pub hostel_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub last_message_at: DateTime<Utc>,
}

impl ThreadResponse {
    pub fn from_row(thread: ChatThread) -> Result<Self, AppError> {
        Ok(Self {
            thread_id: thread.thread_id,
            kind: ChatThreadKind::parse(&thread.kind)
                .ok_or_else(|| AppError::Internal("Invalid thread kind in database".to_string()))?,
            participant_a: thread.participant_a,
            participant_b: thread.participant_b,
            hostel_id: thread.hostel_id,
            created_at: thread.created_at,
            last_message_at: thread.last_message_at,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message_id: Uuid,
    pub thread_id: Uuid,
    pub sender_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<ChatMessage> for MessageResponse {
    fn from(message: ChatMessage) -> Self {
        Self {
            message_id: message.message_id,
            thread_id: message.thread_id,
            sender_id: message.sender_id,
            body: message.body,
            created_at: message.created_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<u32>,
    pub before: Option<DateTime<Utc>>,
}
