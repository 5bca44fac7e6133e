use bunkmate_common::DatabaseConfig;
use bunkmate_database::{create_pool, MigrationRunner};
use rust_decimal::Decimal;
use uuid::Uuid;

// Exercises the booking lifecycle invariants at the SQL level: atomic
// booking + balance + outbox writes, guarded status transitions, refund
// flooring and the running rating average.
#[tokio::test]
async fn test_booking_lifecycle_invariants() {
    // Skip test if no database is available
    if std::env::var("DATABASE_URL").is_err() {
        println!("Skipping database test - DATABASE_URL not set");
        return;
    }

    let config = DatabaseConfig {
        host: "localhost".to_string(),
        port: 5432,
        username: "bunkmate_user".to_string(),
        password: "bunkmate_password".to_string(),
        database: "bunkmate_flow_test".to_string(),
        max_connections: 5,
    };

    let admin_config = DatabaseConfig {
        database: "postgres".to_string(),
        ..config.clone()
    };
    let admin_pool = create_pool(&admin_config)
        .await
        .expect("Failed to connect to admin database");

    sqlx::query(&format!("DROP DATABASE IF EXISTS {}", config.database))
        .execute(&admin_pool)
        .await
        .expect("Failed to drop test database");
    sqlx::query(&format!("CREATE DATABASE {}", config.database))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    let pool = create_pool(&config).await.expect("Failed to connect to test database");
    MigrationRunner::new(pool.clone())
        .run_all_migrations()
        .await
        .expect("Failed to run migrations");

    // Seed a traveler, an owner and a hostel
    let traveler = Uuid::new_v4();
    let owner = Uuid::new_v4();
    for (id, email, role) in [
        (traveler, "traveler@example.com", "user"),
        (owner, "owner@example.com", "owner"),
    ] {
        sqlx::query(
            "INSERT INTO users (user_id, email, display_name, role, hashed_password) VALUES ($1, $2, $3, $4, 'x')",
        )
        .bind(id)
        .bind(email)
        .bind("Seeded")
        .bind(role)
        .execute(&pool)
        .await
        .expect("Failed to seed user");
    }

    let hostel = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO hostels (hostel_id, name, location, price_per_night, capacity, owner_id, owner_name)
        VALUES ($1, 'Harbor Bunk', 'Lisbon', 40.00, 12, $2, 'Seeded')
        "#,
    )
    .bind(hostel)
    .bind(owner)
    .execute(&pool)
    .await
    .expect("Failed to seed hostel");

    // Booking creation: booking + balance + outbox event in one transaction
    let booking = Uuid::new_v4();
    let total = Decimal::new(24000, 2); // 40 * 3 nights * 2 guests
    let mut tx = pool.begin().await.expect("begin");
    sqlx::query(
        r#"
        INSERT INTO bookings (
            booking_id, user_id, owner_id, hostel_id, hostel_name, hostel_location,
            check_in, check_out, guests, price_per_night, total_price, status
        )
        VALUES ($1, $2, $3, $4, 'Harbor Bunk', 'Lisbon',
                '2024-06-01T14:00:00Z', '2024-06-04T10:00:00Z', 2, 40.00, $5, 'pending')
        "#,
    )
    .bind(booking)
    .bind(traveler)
    .bind(owner)
    .bind(hostel)
    .bind(total)
    .execute(&mut *tx)
    .await
    .expect("Failed to insert booking");
    sqlx::query("UPDATE users SET total_spent = total_spent + $2 WHERE user_id = $1")
        .bind(traveler)
        .bind(total)
        .execute(&mut *tx)
        .await
        .expect("Failed to bump total_spent");
    sqlx::query(
        r#"
        INSERT INTO booking_events (event_id, booking_id, event_type, recipient_id, payload)
        VALUES ($1, $2, 'created', $3, '{"hostel_name": "Harbor Bunk"}')
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(booking)
    .bind(owner)
    .execute(&mut *tx)
    .await
    .expect("Failed to queue event");
    tx.commit().await.expect("commit");

    let spent: Decimal = sqlx::query_scalar("SELECT total_spent FROM users WHERE user_id = $1")
        .bind(traveler)
        .fetch_one(&pool)
        .await
        .expect("Failed to read total_spent");
    assert_eq!(spent, total);

    // Guarded owner transition: only a pending booking matches
    let confirmed = sqlx::query(
        "UPDATE bookings SET status = 'confirmed' WHERE booking_id = $1 AND owner_id = $2 AND status = 'pending'",
    )
    .bind(booking)
    .bind(owner)
    .execute(&pool)
    .await
    .expect("Failed to confirm");
    assert_eq!(confirmed.rows_affected(), 1);

    let confirmed_again = sqlx::query(
        "UPDATE bookings SET status = 'confirmed' WHERE booking_id = $1 AND owner_id = $2 AND status = 'pending'",
    )
    .bind(booking)
    .bind(owner)
    .execute(&pool)
    .await
    .expect("Failed to re-confirm");
    assert_eq!(confirmed_again.rows_affected(), 0, "second transition must be a no-op");

    // Traveler cancellation refunds the stored total exactly once
    let cancelled = sqlx::query(
        "UPDATE bookings SET status = 'cancelled' WHERE booking_id = $1 AND user_id = $2 AND status <> 'cancelled'",
    )
    .bind(booking)
    .bind(traveler)
    .execute(&pool)
    .await
    .expect("Failed to cancel");
    assert_eq!(cancelled.rows_affected(), 1);
    sqlx::query("UPDATE users SET total_spent = GREATEST(total_spent - $2, 0) WHERE user_id = $1")
        .bind(traveler)
        .bind(total)
        .execute(&pool)
        .await
        .expect("Failed to refund");

    let spent: Decimal = sqlx::query_scalar("SELECT total_spent FROM users WHERE user_id = $1")
        .bind(traveler)
        .fetch_one(&pool)
        .await
        .expect("Failed to read total_spent");
    assert_eq!(spent, Decimal::ZERO);

    let cancelled_again = sqlx::query(
        "UPDATE bookings SET status = 'cancelled' WHERE booking_id = $1 AND user_id = $2 AND status <> 'cancelled'",
    )
    .bind(booking)
    .bind(traveler)
    .execute(&pool)
    .await
    .expect("Failed to re-cancel");
    assert_eq!(cancelled_again.rows_affected(), 0, "second cancel must be a no-op");

    // Refunds floor at zero even when the balance is already lower
    sqlx::query("UPDATE users SET total_spent = 100.00 WHERE user_id = $1")
        .bind(traveler)
        .execute(&pool)
        .await
        .expect("Failed to reset balance");
    sqlx::query("UPDATE users SET total_spent = GREATEST(total_spent - 240.00, 0) WHERE user_id = $1")
        .bind(traveler)
        .execute(&pool)
        .await
        .expect("Failed to refund past zero");
    let spent: Decimal = sqlx::query_scalar("SELECT total_spent FROM users WHERE user_id = $1")
        .bind(traveler)
        .fetch_one(&pool)
        .await
        .expect("Failed to read total_spent");
    assert_eq!(spent, Decimal::ZERO);

    // Rating recomputation: r1..rN from a fresh hostel ends at round(mean, 1)
    for rating in [5, 4, 3] {
        let mut tx = pool.begin().await.expect("begin");
        sqlx::query(
            r#"
            UPDATE hostels SET
                rating = ROUND((rating * review_count + $2) / (review_count + 1), 1),
                review_count = review_count + 1
            WHERE hostel_id = $1
            "#,
        )
        .bind(hostel)
        .bind(rating)
        .execute(&mut *tx)
        .await
        .expect("Failed to recompute rating");
        sqlx::query(
            "INSERT INTO reviews (review_id, hostel_id, user_id, rating, comment) VALUES ($1, $2, $3, $4, 'ok')",
        )
        .bind(Uuid::new_v4())
        .bind(hostel)
        .bind(traveler)
        .bind(rating)
        .execute(&mut *tx)
        .await
        .expect("Failed to insert review");
        tx.commit().await.expect("commit");
    }

    let (rating, review_count): (Decimal, i32) = sqlx::query_as(
        "SELECT rating, review_count FROM hostels WHERE hostel_id = $1",
    )
    .bind(hostel)
    .fetch_one(&pool)
    .await
    .expect("Failed to read rating");
    assert_eq!(review_count, 3);
    assert_eq!(rating, Decimal::new(40, 1)); // mean(5, 4, 3) = 4.0

    // Outbox drain is exactly-once: notification insert and processed stamp
    // commit together
    let mut tx = pool.begin().await.expect("begin");
    let pending: Vec<(Uuid, Uuid)> = sqlx::query_as(
        "SELECT event_id, recipient_id FROM booking_events WHERE processed_at IS NULL FOR UPDATE SKIP LOCKED",
    )
    .fetch_all(&mut *tx)
    .await
    .expect("Failed to claim events");
    assert_eq!(pending.len(), 1);
    for (event_id, recipient_id) in &pending {
        sqlx::query(
            r#"
            INSERT INTO notifications (notification_id, user_id, kind, title, message)
            VALUES ($1, $2, 'owner_booking_request', 'New booking request', 'test')
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(recipient_id)
        .execute(&mut *tx)
        .await
        .expect("Failed to insert notification");
        sqlx::query("UPDATE booking_events SET processed_at = NOW() WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut *tx)
            .await
            .expect("Failed to stamp event");
    }
    tx.commit().await.expect("commit");

    let remaining: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM booking_events WHERE processed_at IS NULL",
    )
    .fetch_one(&pool)
    .await
    .expect("Failed to count events");
    assert_eq!(remaining, 0);

    let owner_notifications: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM notifications WHERE user_id = $1",
    )
    .bind(owner)
    .fetch_one(&pool)
    .await
    .expect("Failed to count notifications");
    assert_eq!(owner_notifications, 1);

    // Cleanup - drop test database
    drop(pool);
    sqlx::query(&format!("DROP DATABASE {} WITH (FORCE)", config.database))
        .execute(&admin_pool)
        .await
        .expect("Failed to cleanup test database");
}
