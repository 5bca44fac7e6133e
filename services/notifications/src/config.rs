use serde::{Deserialize, Serialize};

use bunkmate_common::{DatabaseConfig, JwtConfig, RedisConfig, ServerConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    // Six-field cron expressions (seconds first)
    pub outbox_drain_cron: String,
    pub promo_cron: String,
    pub promo_window_seconds: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(8005),
            database: DatabaseConfig::from_env(),
            redis: RedisConfig::from_env(),
            jwt: JwtConfig::from_env(),
            outbox_drain_cron: std::env::var("OUTBOX_DRAIN_CRON")
                .unwrap_or_else(|_| "*/10 * * * * *".to_string()),
            promo_cron: std::env::var("PROMO_CRON")
                .unwrap_or_else(|_| "0 * * * * *".to_string()),
            promo_window_seconds: std::env::var("PROMO_WINDOW_SECONDS")
                .unwrap_or_else(|_| "86400".to_string())
                .parse()
                .unwrap_or(86400),
        }
    }
}
