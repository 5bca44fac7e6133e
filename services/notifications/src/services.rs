use sqlx::PgPool;
use uuid::Uuid;

use bunkmate_common::AppError;
use bunkmate_database::Notification;

use crate::models::*;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
}

pub struct NotificationService {
    db_pool: PgPool,
}

impl NotificationService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db_pool: state.db_pool.clone(),
        }
    }

    // Feed, newest first
    pub async fn list_notifications(
        &self,
        user_id: Uuid,
        unread_only: bool,
    ) -> Result<Vec<NotificationResponse>, AppError> {
        let rows = if unread_only {
            sqlx::query_as::<_, Notification>(
                r#"
                SELECT * FROM notifications
                WHERE user_id = $1 AND is_read = FALSE
                ORDER BY created_at DESC
                "#,
            )
            .bind(user_id)
            .fetch_all(&self.db_pool)
            .await
            .map_err(AppError::Database)?
        } else {
            sqlx::query_as::<_, Notification>(
                "SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC",
            )
            .bind(user_id)
            .fetch_all(&self.db_pool)
            .await
            .map_err(AppError::Database)?
        };

        rows.into_iter().map(NotificationResponse::from_row).collect()
    }

    pub async fn mark_read(&self, user_id: Uuid, notification_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE notification_id = $1 AND user_id = $2",
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(&self.db_pool)
        .await
        .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Notification not found".to_string()));
        }

        Ok(())
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(&self.db_pool)
        .await
        .map_err(AppError::Database)?;

        Ok(result.rows_affected())
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<UnreadCountResponse, AppError> {
        let unread: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.db_pool)
        .await
        .map_err(AppError::Database)?;

        Ok(UnreadCountResponse { unread })
    }
}
