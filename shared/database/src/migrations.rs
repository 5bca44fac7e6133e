use sqlx::migrate::Migrate;
use sqlx::PgPool;

use bunkmate_common::AppError;

pub struct MigrationRunner {
    pool: PgPool,
}

impl MigrationRunner {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn run_all_migrations(&self) -> Result<(), AppError> {
        tracing::info!("Starting database migrations...");

        let migrator = sqlx::migrate!("./migrations");
        migrator
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Migration error: {}", e)))?;

        tracing::info!("All migrations completed successfully");
        Ok(())
    }

    pub async fn check_migration_status(&self) -> Result<MigrationStatus, AppError> {
        let migrator = sqlx::migrate!("./migrations");
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::Internal(format!("Migration error: {}", e)))?;
        let applied = conn
            .list_applied_migrations()
            .await
            .map_err(|e| AppError::Internal(format!("Migration error: {}", e)))?;

        let total = migrator.migrations.len();
        let applied_count = applied.len();
        let pending = total - applied_count;

        Ok(MigrationStatus {
            total,
            applied: applied_count,
            pending,
            is_up_to_date: pending == 0,
        })
    }
}

#[derive(Debug)]
pub struct MigrationStatus {
    pub total: usize,
    pub applied: usize,
    pub pending: usize,
    pub is_up_to_date: bool,
}

impl std::fmt::Display for MigrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Migrations: {}/{} applied, {} pending",
            self.applied, self.total, self.pending
        )
    }
}
