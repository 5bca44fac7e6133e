use bunkmate_common::DatabaseConfig;
use bunkmate_database::{create_pool, MigrationRunner};
use sqlx::Row;

#[tokio::test]
async fn test_database_connection_and_migrations() {
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
        database: "bunkmate_test".to_string(),
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

    let pool = create_pool(&config)
        .await
        .expect("Failed to connect to test database");

    let runner = MigrationRunner::new(pool.clone());
    runner.run_all_migrations().await.expect("Failed to run migrations");

    let status = runner
        .check_migration_status()
        .await
        .expect("Failed to check migration status");
    assert!(status.is_up_to_date, "Migrations left pending: {}", status);

    // Insert a traveler and read it back
    let user_id = uuid::Uuid::new_v4();
    sqlx::query(
        "INSERT INTO users (user_id, email, display_name, role, hashed_password) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(user_id)
    .bind("traveler@example.com")
    .bind("Test Traveler")
    .bind("user")
    .bind("hashed_password")
    .execute(&pool)
    .await
    .expect("Failed to insert test user");

    let row = sqlx::query("SELECT display_name, total_spent::TEXT AS total_spent FROM users WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(&pool)
        .await
        .expect("Failed to query test user");

    let display_name: String = row.get("display_name");
    assert_eq!(display_name, "Test Traveler");
    let total_spent: String = row.get("total_spent");
    assert_eq!(total_spent, "0.00");

    // Wishlist uniqueness is enforced by the store, not application logic
    let owner_id = uuid::Uuid::new_v4();
    sqlx::query(
        "INSERT INTO users (user_id, email, display_name, role, hashed_password) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(owner_id)
    .bind("owner@example.com")
    .bind("Test Owner")
    .bind("owner")
    .bind("hashed_password")
    .execute(&pool)
    .await
    .expect("Failed to insert test owner");

    let hostel_id = uuid::Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO hostels (hostel_id, name, location, price_per_night, capacity, owner_id, owner_name)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(hostel_id)
    .bind("Harbor Bunk")
    .bind("Lisbon")
    .bind(rust_decimal::Decimal::new(2500, 2))
    .bind(12)
    .bind(owner_id)
    .bind("Test Owner")
    .execute(&pool)
    .await
    .expect("Failed to insert test hostel");

    sqlx::query(
        r#"
        INSERT INTO wishlist (entry_id, user_id, hostel_id, hostel_name, hostel_location, price_per_night)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(uuid::Uuid::new_v4())
    .bind(user_id)
    .bind(hostel_id)
    .bind("Harbor Bunk")
    .bind("Lisbon")
    .bind(rust_decimal::Decimal::new(2500, 2))
    .execute(&pool)
    .await
    .expect("Failed to insert wishlist entry");

    let duplicate = sqlx::query(
        r#"
        INSERT INTO wishlist (entry_id, user_id, hostel_id, hostel_name, hostel_location, price_per_night)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(uuid::Uuid::new_v4())
    .bind(user_id)
    .bind(hostel_id)
    .bind("Harbor Bunk")
    .bind("Lisbon")
    .bind(rust_decimal::Decimal::new(2500, 2))
    .execute(&pool)
    .await;
    assert!(duplicate.is_err(), "Duplicate wishlist entry was not rejected");

    // Cleanup - drop test database
    drop(pool);
    sqlx::query(&format!("DROP DATABASE {} WITH (FORCE)", config.database))
        .execute(&admin_pool)
        .await
        .expect("Failed to cleanup test database");
}
