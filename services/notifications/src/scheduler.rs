use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler};

use bunkmate_common::{AppError, RedisService};

use crate::config::AppConfig;
use crate::outbox::{drain_outbox_once, send_promotional_offers};

// Two background jobs: the outbox drain that turns booking events into
// notifications, and the periodic promotional sweep.
pub struct BackgroundJobs {
    scheduler: JobScheduler,
}

impl BackgroundJobs {
    pub async fn new(
        db_pool: PgPool,
        redis_service: RedisService,
        config: &AppConfig,
    ) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::Internal(format!("Scheduler creation error: {}", e)))?;

        let drain_pool = db_pool.clone();
        let drain_job = Job::new_async(config.outbox_drain_cron.as_str(), move |_id, _sched| {
            let pool = drain_pool.clone();
            Box::pin(async move {
                if let Err(err) = drain_outbox_once(&pool).await {
                    tracing::error!("Outbox drain failed: {:?}", err);
                }
            })
        })
        .map_err(|e| AppError::Internal(format!("Scheduler job error: {}", e)))?;

        let promo_pool = db_pool.clone();
        let promo_window = config.promo_window_seconds;
        let promo_job = Job::new_async(config.promo_cron.as_str(), move |_id, _sched| {
            let pool = promo_pool.clone();
            let redis = redis_service.clone();
            Box::pin(async move {
                if let Err(err) = send_promotional_offers(&pool, &redis, promo_window).await {
                    tracing::error!("Promotional sweep failed: {:?}", err);
                }
            })
        })
        .map_err(|e| AppError::Internal(format!("Scheduler job error: {}", e)))?;

        scheduler
            .add(drain_job)
            .await
            .map_err(|e| AppError::Internal(format!("Scheduler add error: {}", e)))?;
        scheduler
            .add(promo_job)
            .await
            .map_err(|e| AppError::Internal(format!("Scheduler add error: {}", e)))?;

        Ok(Self { scheduler })
    }

    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::Internal(format!("Scheduler start error: {}", e)))?;

        tracing::info!("Notification background jobs started");
        Ok(())
    }
}
