use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use bunkmate_auth::Claims;
use bunkmate_common::{AppError, BookingEventType, BookingStatus};
use bunkmate_database::{Booking, Hostel};

use crate::export::bookings_to_csv;
use crate::models::*;
use crate::pricing::{booking_total, nights_between, validate_discount};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
}

pub struct BookingService {
    db_pool: PgPool,
}

impl BookingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db_pool: state.db_pool.clone(),
        }
    }

    // Booking creation: the booking row, the traveler's running total and the
    // owner-facing outbox event commit atomically.
    pub async fn create_booking(
        &self,
        user_id: Uuid,
        request: CreateBookingRequest,
    ) -> Result<BookingResponse, AppError> {
        let discount = request.discount_percent.unwrap_or(Decimal::ZERO);
        validate_discount(discount)?;
        let nights = nights_between(request.check_in, request.check_out)?;

        let hostel = sqlx::query_as::<_, Hostel>("SELECT * FROM hostels WHERE hostel_id = $1")
            .bind(request.hostel_id)
            .fetch_optional(&self.db_pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Hostel not found".to_string()))?;

        let total = booking_total(hostel.price_per_night, nights, request.guests, discount);

        let mut tx = self.db_pool.begin().await.map_err(AppError::Database)?;

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (
                booking_id, user_id, owner_id, hostel_id, hostel_name,
                hostel_image, hostel_location, check_in, check_out, guests,
                price_per_night, total_price, discount_percent, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, 'pending')
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(hostel.owner_id)
        .bind(hostel.hostel_id)
        .bind(&hostel.name)
        .bind(hostel.images.first().cloned())
        .bind(&hostel.location)
        .bind(request.check_in)
        .bind(request.check_out)
        .bind(request.guests)
        .bind(hostel.price_per_night)
        .bind(total)
        .bind(discount)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        sqlx::query(
            "UPDATE users SET total_spent = total_spent + $2, updated_at = NOW() WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(total)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        queue_booking_event(&mut tx, &booking, BookingEventType::Created, booking.owner_id)
            .await?;

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!(
            "Booking {} created for hostel {} ({} nights, total {})",
            booking.booking_id,
            booking.hostel_id,
            nights,
            total
        );

        BookingResponse::from_row(booking)
    }

    pub async fn list_user_bookings(&self, user_id: Uuid) -> Result<Vec<BookingResponse>, AppError> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await
        .map_err(AppError::Database)?;

        bookings.into_iter().map(BookingResponse::from_row).collect()
    }

    pub async fn list_owner_bookings(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<BookingResponse>, AppError> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.db_pool)
        .await
        .map_err(AppError::Database)?;

        bookings.into_iter().map(BookingResponse::from_row).collect()
    }

    // Only the two participants may see a booking.
    pub async fn get_booking(
        &self,
        claims: &Claims,
        booking_id: Uuid,
    ) -> Result<BookingResponse, AppError> {
        let viewer = claims.user_id()?;

        let booking = self.fetch_booking(booking_id).await?;
        if booking.user_id != viewer && booking.owner_id != viewer {
            return Err(AppError::Authorization(
                "Not a participant in this booking".to_string(),
            ));
        }

        BookingResponse::from_row(booking)
    }

    // Owner approval/decline. The precondition lives in the UPDATE itself so
    // two racing transitions cannot both win.
    pub async fn set_status(
        &self,
        owner_id: Uuid,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> Result<BookingResponse, AppError> {
        let event_type = match status {
            BookingStatus::Confirmed => BookingEventType::Confirmed,
            BookingStatus::Cancelled => BookingEventType::Cancelled,
            BookingStatus::Pending => {
                return Err(AppError::Validation(
                    "Status must be confirmed or cancelled".to_string(),
                ))
            }
        };

        let mut tx = self.db_pool.begin().await.map_err(AppError::Database)?;

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings SET status = $3, updated_at = NOW()
            WHERE booking_id = $1 AND owner_id = $2 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(booking_id)
        .bind(owner_id)
        .bind(status.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        let booking = match booking {
            Some(booking) => booking,
            None => return Err(self.transition_failure(booking_id, owner_id, true).await),
        };

        if status == BookingStatus::Cancelled {
            apply_refund(&mut tx, booking.user_id, booking.total_price).await?;
        }

        queue_booking_event(&mut tx, &booking, event_type, booking.user_id).await?;

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!(
            "Booking {} transitioned to {} by owner {}",
            booking_id,
            status.as_str(),
            owner_id
        );

        BookingResponse::from_row(booking)
    }

    // Traveler cancellation. Allowed from any non-cancelled state; the stored
    // total is refunded as-is rather than recomputed from the current hostel
    // price.
    pub async fn cancel_booking(
        &self,
        user_id: Uuid,
        booking_id: Uuid,
    ) -> Result<BookingResponse, AppError> {
        let mut tx = self.db_pool.begin().await.map_err(AppError::Database)?;

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings SET status = 'cancelled', updated_at = NOW()
            WHERE booking_id = $1 AND user_id = $2 AND status <> 'cancelled'
            RETURNING *
            "#,
        )
        .bind(booking_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        let booking = match booking {
            Some(booking) => booking,
            None => return Err(self.transition_failure(booking_id, user_id, false).await),
        };

        apply_refund(&mut tx, booking.user_id, booking.total_price).await?;

        queue_booking_event(&mut tx, &booking, BookingEventType::Cancelled, booking.owner_id)
            .await?;

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!("Booking {} cancelled by user {}", booking_id, user_id);

        BookingResponse::from_row(booking)
    }

    // Distinguish not-found / not-yours / already-transitioned after a guarded
    // UPDATE matched nothing.
    async fn transition_failure(&self, booking_id: Uuid, actor: Uuid, owner_side: bool) -> AppError {
        let booking = match self.fetch_booking(booking_id).await {
            Ok(booking) => booking,
            Err(err) => return err,
        };

        let participant = if owner_side { booking.owner_id } else { booking.user_id };
        if participant != actor {
            return AppError::Authorization("Not a participant in this booking".to_string());
        }

        if owner_side {
            AppError::Conflict("Only pending bookings can be approved or declined".to_string())
        } else {
            AppError::Conflict("Booking is already cancelled".to_string())
        }
    }

    async fn fetch_booking(&self, booking_id: Uuid) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE booking_id = $1")
            .bind(booking_id)
            .fetch_optional(&self.db_pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
    }

    // Owner console aggregates
    pub async fn owner_stats(&self, owner_id: Uuid) -> Result<OwnerStatsResponse, AppError> {
        let row = sqlx::query_as::<_, (i64, i64, i64, i64, Decimal)>(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE status = 'pending'),
                COUNT(*) FILTER (WHERE status = 'confirmed'),
                COUNT(*) FILTER (WHERE status = 'cancelled'),
                COALESCE(SUM(total_price) FILTER (WHERE status = 'confirmed'), 0)
            FROM bookings
            WHERE owner_id = $1
            "#,
        )
        .bind(owner_id)
        .fetch_one(&self.db_pool)
        .await
        .map_err(AppError::Database)?;

        Ok(OwnerStatsResponse {
            total_bookings: row.0,
            pending: row.1,
            confirmed: row.2,
            cancelled: row.3,
            confirmed_revenue: row.4,
        })
    }

    pub async fn export_owner_bookings(&self, owner_id: Uuid) -> Result<String, AppError> {
        let rows = sqlx::query_as::<_, BookingExportRow>(
            r#"
            SELECT
                b.booking_id, b.hostel_name, u.email AS user_email,
                b.check_in, b.check_out, b.total_price, b.guests,
                b.status, b.discount_percent, b.created_at
            FROM bookings b
            JOIN users u ON u.user_id = b.user_id
            WHERE b.owner_id = $1
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db_pool)
        .await
        .map_err(AppError::Database)?;

        Ok(bookings_to_csv(&rows))
    }
}

// Refunds subtract the stored booking total from the traveler's running
// spend, floored at zero.
async fn apply_refund(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    amount: Decimal,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE users SET total_spent = GREATEST(total_spent - $2, 0), updated_at = NOW() WHERE user_id = $1",
    )
    .bind(user_id)
    .bind(amount)
    .execute(&mut **tx)
    .await
    .map_err(AppError::Database)?;

    Ok(())
}

async fn queue_booking_event(
    tx: &mut Transaction<'_, Postgres>,
    booking: &Booking,
    event_type: BookingEventType,
    recipient_id: Uuid,
) -> Result<(), AppError> {
    let payload = serde_json::json!({
        "hostel_name": booking.hostel_name,
        "check_in": booking.check_in,
        "check_out": booking.check_out,
        "guests": booking.guests,
        "total_price": booking.total_price,
    });

    sqlx::query(
        r#"
        INSERT INTO booking_events (event_id, booking_id, event_type, recipient_id, payload)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(booking.booking_id)
    .bind(event_type.as_str())
    .bind(recipient_id)
    .bind(payload)
    .execute(&mut **tx)
    .await
    .map_err(AppError::Database)?;

    Ok(())
}
