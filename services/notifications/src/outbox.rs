use sqlx::PgPool;
use uuid::Uuid;

use bunkmate_common::{AppError, BookingEventType, NotificationKind, RedisKeys, RedisService};
use bunkmate_database::BookingEvent;

// Turns one booking event into the notification shown to its recipient.
pub fn compose_notification(event: &BookingEvent) -> Result<(NotificationKind, String, String), AppError> {
    let event_type = BookingEventType::parse(&event.event_type)
        .ok_or_else(|| AppError::Internal("Invalid event type in outbox".to_string()))?;

    let hostel_name = event
        .payload
        .get("hostel_name")
        .and_then(|v| v.as_str())
        .unwrap_or("a hostel")
        .to_string();

    let composed = match event_type {
        BookingEventType::Created => (
            NotificationKind::OwnerBookingRequest,
            "New booking request".to_string(),
            format!("A traveler requested a stay at {}", hostel_name),
        ),
        BookingEventType::Confirmed => (
            NotificationKind::Booking,
            "Booking confirmed".to_string(),
            format!("Your booking at {} was confirmed", hostel_name),
        ),
        BookingEventType::Cancelled => (
            NotificationKind::Booking,
            "Booking cancelled".to_string(),
            format!("A booking at {} was cancelled", hostel_name),
        ),
    };

    Ok(composed)
}

// Claim a batch of unprocessed events, insert one notification each, and
// stamp them processed - all in one transaction, so a crash mid-batch never
// yields duplicates. SKIP LOCKED keeps concurrent drains from colliding.
pub async fn drain_outbox_once(pool: &PgPool) -> Result<usize, AppError> {
    let mut tx = pool.begin().await.map_err(AppError::Database)?;

    let events = sqlx::query_as::<_, BookingEvent>(
        r#"
        SELECT * FROM booking_events
        WHERE processed_at IS NULL
        ORDER BY created_at ASC
        LIMIT 50
        FOR UPDATE SKIP LOCKED
        "#,
    )
    .fetch_all(&mut *tx)
    .await
    .map_err(AppError::Database)?;

    if events.is_empty() {
        return Ok(0);
    }

    for event in &events {
        let (kind, title, message) = compose_notification(event)?;

        sqlx::query(
            r#"
            INSERT INTO notifications (notification_id, user_id, kind, title, message, related_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(event.recipient_id)
        .bind(kind.as_str())
        .bind(&title)
        .bind(&message)
        .bind(event.booking_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        sqlx::query("UPDATE booking_events SET processed_at = NOW() WHERE event_id = $1")
            .bind(event.event_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
    }

    tx.commit().await.map_err(AppError::Database)?;

    tracing::info!("Drained {} booking events", events.len());
    Ok(events.len())
}

// Fire-and-forget promotional offers for active travelers, at most one per
// user per promo window (stamped in Redis).
pub async fn send_promotional_offers(
    pool: &PgPool,
    redis_service: &RedisService,
    window_seconds: u64,
) -> Result<usize, AppError> {
    let travelers: Vec<Uuid> = sqlx::query_scalar(
        "SELECT user_id FROM users WHERE status = 'active' AND role = 'user'",
    )
    .fetch_all(pool)
    .await
    .map_err(AppError::Database)?;

    let mut sent = 0;
    for user_id in travelers {
        let fresh = redis_service
            .set_if_absent(&RedisKeys::promo_stamp(&user_id.to_string()), "1", window_seconds)
            .await?;
        if !fresh {
            continue;
        }

        sqlx::query(
            r#"
            INSERT INTO notifications (notification_id, user_id, kind, title, message)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(NotificationKind::Offer.as_str())
        .bind("Deals for your next trip")
        .bind("Fresh discounts on popular hostels are live - take a look")
        .execute(pool)
        .await
        .map_err(AppError::Database)?;

        sent += 1;
    }

    if sent > 0 {
        tracing::info!("Sent {} promotional notifications", sent);
    }
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn event(event_type: &str, payload: serde_json::Value) -> BookingEvent {
        BookingEvent {
            event_id: Uuid::new_v4(),
            booking_id: Uuid::new_v4(),
            event_type: event_type.to_string(),
            recipient_id: Uuid::new_v4(),
            payload,
            created_at: Utc::now(),
            processed_at: None,
        }
    }

    #[test]
    fn created_events_notify_the_owner_side() {
        let event = event("created", serde_json::json!({"hostel_name": "Harbor Bunk"}));
        let (kind, title, message) = compose_notification(&event).unwrap();

        assert_eq!(kind, NotificationKind::OwnerBookingRequest);
        assert_eq!(title, "New booking request");
        assert!(message.contains("Harbor Bunk"));
    }

    #[test]
    fn confirmed_and_cancelled_events_use_the_booking_kind() {
        let confirmed = event("confirmed", serde_json::json!({"hostel_name": "Harbor Bunk"}));
        let (kind, title, _) = compose_notification(&confirmed).unwrap();
        assert_eq!(kind, NotificationKind::Booking);
        assert_eq!(title, "Booking confirmed");

        let cancelled = event("cancelled", serde_json::json!({"hostel_name": "Harbor Bunk"}));
        let (kind, title, _) = compose_notification(&cancelled).unwrap();
        assert_eq!(kind, NotificationKind::Booking);
        assert_eq!(title, "Booking cancelled");
    }

    #[test]
    fn missing_payload_fields_fall_back_gracefully() {
        let event = event("confirmed", serde_json::json!({}));
        let (_, _, message) = compose_notification(&event).unwrap();
        assert!(message.contains("a hostel"));
    }

    #[test]
    fn unknown_event_types_are_rejected() {
        let event = event("exploded", serde_json::json!({}));
        assert!(compose_notification(&event).is_err());
    }
}
