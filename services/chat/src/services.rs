use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use bunkmate_auth::Claims;
use bunkmate_common::{AppError, NotificationKind};
use bunkmate_database::{ChatMessage, ChatThread};

use crate::models::*;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
}

// Direct threads are keyed on the normalized participant pair so both sides
// resolve the same thread regardless of who writes first.
pub fn normalize_pair(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

pub struct ChatService {
    db_pool: PgPool,
}

impl ChatService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db_pool: state.db_pool.clone(),
        }
    }

    // Resolve (or create) the thread for the request, then append.
    pub async fn send_message(
        &self,
        claims: &Claims,
        request: SendMessageRequest,
    ) -> Result<MessageResponse, AppError> {
        let sender_id = claims.user_id()?;

        let thread = match (request.recipient_id, request.hostel_id) {
            (Some(recipient_id), None) => {
                if recipient_id == sender_id {
                    return Err(AppError::Validation(
                        "Cannot start a chat with yourself".to_string(),
                    ));
                }
                self.resolve_direct_thread(sender_id, recipient_id).await?
            }
            (None, Some(hostel_id)) => self.resolve_support_thread(sender_id, hostel_id).await?,
            _ => {
                return Err(AppError::Validation(
                    "Provide exactly one of recipient_id or hostel_id".to_string(),
                ))
            }
        };

        self.append_message(&thread, sender_id, &claims.display_name, &request.body)
            .await
    }

    // Reply inside an existing thread; either participant may write.
    pub async fn reply(
        &self,
        claims: &Claims,
        thread_id: Uuid,
        request: ReplyRequest,
    ) -> Result<MessageResponse, AppError> {
        let sender_id = claims.user_id()?;
        let thread = self.fetch_thread(thread_id).await?;

        if thread.participant_a != sender_id && thread.participant_b != sender_id {
            return Err(AppError::Authorization(
                "Not a participant in this thread".to_string(),
            ));
        }

        self.append_message(&thread, sender_id, &claims.display_name, &request.body)
            .await
    }

    async fn resolve_direct_thread(
        &self,
        sender_id: Uuid,
        recipient_id: Uuid,
    ) -> Result<ChatThread, AppError> {
        let (a, b) = normalize_pair(sender_id, recipient_id);

        if let Some(thread) = sqlx::query_as::<_, ChatThread>(
            "SELECT * FROM chat_threads WHERE kind = 'direct' AND participant_a = $1 AND participant_b = $2",
        )
        .bind(a)
        .bind(b)
        .fetch_optional(&self.db_pool)
        .await
        .map_err(AppError::Database)?
        {
            return Ok(thread);
        }

        // First message in the pair: create the thread. A concurrent creation
        // loses to the unique index and falls through to the re-select.
        sqlx::query(
            r#"
            INSERT INTO chat_threads (thread_id, kind, participant_a, participant_b)
            VALUES ($1, 'direct', $2, $3)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(a)
        .bind(b)
        .execute(&self.db_pool)
        .await
        .map_err(AppError::Database)?;

        sqlx::query_as::<_, ChatThread>(
            "SELECT * FROM chat_threads WHERE kind = 'direct' AND participant_a = $1 AND participant_b = $2",
        )
        .bind(a)
        .bind(b)
        .fetch_one(&self.db_pool)
        .await
        .map_err(AppError::Database)
    }

    async fn resolve_support_thread(
        &self,
        traveler_id: Uuid,
        hostel_id: Uuid,
    ) -> Result<ChatThread, AppError> {
        let owner_id: Uuid = sqlx::query_scalar(
            "SELECT owner_id FROM hostels WHERE hostel_id = $1",
        )
        .bind(hostel_id)
        .fetch_optional(&self.db_pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("Hostel not found".to_string()))?;

        if owner_id == traveler_id {
            return Err(AppError::Validation(
                "Owners cannot open a support thread on their own hostel".to_string(),
            ));
        }

        if let Some(thread) = sqlx::query_as::<_, ChatThread>(
            "SELECT * FROM chat_threads WHERE kind = 'support' AND participant_a = $1 AND hostel_id = $2",
        )
        .bind(traveler_id)
        .bind(hostel_id)
        .fetch_optional(&self.db_pool)
        .await
        .map_err(AppError::Database)?
        {
            return Ok(thread);
        }

        sqlx::query(
            r#"
            INSERT INTO chat_threads (thread_id, kind, participant_a, participant_b, hostel_id)
            VALUES ($1, 'support', $2, $3, $4)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(traveler_id)
        .bind(owner_id)
        .bind(hostel_id)
        .execute(&self.db_pool)
        .await
        .map_err(AppError::Database)?;

        sqlx::query_as::<_, ChatThread>(
            "SELECT * FROM chat_threads WHERE kind = 'support' AND participant_a = $1 AND hostel_id = $2",
        )
        .bind(traveler_id)
        .bind(hostel_id)
        .fetch_one(&self.db_pool)
        .await
        .map_err(AppError::Database)
    }

    // Message append, thread recency bump and recipient notification commit
    // together. Ordering within a thread follows the server-assigned
    // created_at timestamp.
    async fn append_message(
        &self,
        thread: &ChatThread,
        sender_id: Uuid,
        sender_name: &str,
        body: &str,
    ) -> Result<MessageResponse, AppError> {
        let recipient_id = if thread.participant_a == sender_id {
            thread.participant_b
        } else {
            thread.participant_a
        };

        let mut tx = self.db_pool.begin().await.map_err(AppError::Database)?;

        let message = sqlx::query_as::<_, ChatMessage>(
            r#"
            INSERT INTO chat_messages (message_id, thread_id, sender_id, body)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(thread.thread_id)
        .bind(sender_id)
        .bind(body)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        sqlx::query("UPDATE chat_threads SET last_message_at = $2 WHERE thread_id = $1")
            .bind(thread.thread_id)
            .bind(message.created_at)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        insert_chat_notification(&mut tx, recipient_id, sender_name, thread.thread_id).await?;

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!(
            "Message {} appended to thread {}",
            message.message_id,
            thread.thread_id
        );

        Ok(message.into())
    }

    pub async fn list_threads(&self, user_id: Uuid) -> Result<Vec<ThreadResponse>, AppError> {
        let threads = sqlx::query_as::<_, ChatThread>(
            r#"
            SELECT * FROM chat_threads
            WHERE participant_a = $1 OR participant_b = $1
            ORDER BY last_message_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await
        .map_err(AppError::Database)?;

        threads.into_iter().map(ThreadResponse::from_row).collect()
    }

    pub async fn get_messages(
        &self,
        user_id: Uuid,
        thread_id: Uuid,
        query: &HistoryQuery,
    ) -> Result<Vec<MessageResponse>, AppError> {
        let thread = self.fetch_thread(thread_id).await?;
        if thread.participant_a != user_id && thread.participant_b != user_id {
            return Err(AppError::Authorization(
                "Not a participant in this thread".to_string(),
            ));
        }

        let limit = query.limit.unwrap_or(50).min(100) as i64;

        let messages = match query.before {
            Some(before) => sqlx::query_as::<_, ChatMessage>(
                r#"
                SELECT * FROM chat_messages
                WHERE thread_id = $1 AND created_at < $2
                ORDER BY created_at ASC
                LIMIT $3
                "#,
            )
            .bind(thread_id)
            .bind(before)
            .bind(limit)
            .fetch_all(&self.db_pool)
            .await
            .map_err(AppError::Database)?,
            None => sqlx::query_as::<_, ChatMessage>(
                r#"
                SELECT * FROM chat_messages
                WHERE thread_id = $1
                ORDER BY created_at ASC
                LIMIT $2
                "#,
            )
            .bind(thread_id)
            .bind(limit)
            .fetch_all(&self.db_pool)
            .await
            .map_err(AppError::Database)?,
        };

        Ok(messages.into_iter().map(MessageResponse::from).collect())
    }

    async fn fetch_thread(&self, thread_id: Uuid) -> Result<ChatThread, AppError> {
        sqlx::query_as::<_, ChatThread>("SELECT * FROM chat_threads WHERE thread_id = $1")
            .bind(thread_id)
            .fetch_optional(&self.db_pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Thread not found".to_string()))
    }
}

async fn insert_chat_notification(
    tx: &mut Transaction<'_, Postgres>,
    recipient_id: Uuid,
    sender_name: &str,
    thread_id: Uuid,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO notifications (notification_id, user_id, kind, title, message, related_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(recipient_id)
    .bind(NotificationKind::Chat.as_str())
    .bind("New message")
    .bind(format!("{} sent you a message", sender_name))
    .bind(thread_id)
    .execute(&mut **tx)
    .await
    .map_err(AppError::Database)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_normalization_is_order_independent() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        assert_eq!(normalize_pair(a, b), normalize_pair(b, a));
    }

    #[test]
    fn normalized_pair_is_sorted() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let (low, high) = normalize_pair(a, b);
        assert!(low <= high);
    }
}
