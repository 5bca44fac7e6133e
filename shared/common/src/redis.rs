use ::redis::{aio::ConnectionManager, AsyncCommands, Client};
use serde::{de::DeserializeOwned, Serialize};

use crate::{AppError, RedisConfig};

// Key builders so every service agrees on the keyspace layout.
pub struct RedisKeys;

impl RedisKeys {
    pub fn session(user_id: &str) -> String {
        format!("session:{}", user_id)
    }

    pub fn password_reset(token: &str) -> String {
        format!("password_reset:{}", token)
    }

    pub fn hostel_listing_cache() -> String {
        "cache:hostels:all".to_string()
    }

    pub fn rate_limit(subject: &str, path: &str) -> String {
        format!("rate_limit:{}:{}", subject, path)
    }

    pub fn promo_stamp(user_id: &str) -> String {
        format!("promo_sent:{}", user_id)
    }
}

#[derive(Clone)]
pub struct RedisService {
    manager: ConnectionManager,
}

impl RedisService {
    pub async fn new(config: &RedisConfig) -> Result<Self, AppError> {
        let client = Client::open(config.connection_string()).map_err(AppError::Redis)?;

        let manager = ConnectionManager::new(client).await.map_err(AppError::Redis)?;

        // Test connection
        let mut conn = manager.clone();
        let _: String = ::redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(AppError::Redis)?;

        tracing::info!("Redis connection established");

        Ok(Self { manager })
    }

    // Session management
    pub async fn set_session(&self, user_id: &str, token: &str, expiry_seconds: u64) -> Result<(), AppError> {
        let mut conn = self.manager.clone();
        conn.set_ex(RedisKeys::session(user_id), token, expiry_seconds)
            .await
            .map_err(AppError::Redis)
    }

    pub async fn get_session(&self, user_id: &str) -> Result<Option<String>, AppError> {
        let mut conn = self.manager.clone();
        conn.get(RedisKeys::session(user_id))
            .await
            .map_err(AppError::Redis)
    }

    pub async fn delete_session(&self, user_id: &str) -> Result<(), AppError> {
        let mut conn = self.manager.clone();
        conn.del(RedisKeys::session(user_id))
            .await
            .map_err(AppError::Redis)
    }

    // Password reset tokens, single use with TTL
    pub async fn set_reset_token(&self, token: &str, user_id: &str, expiry_seconds: u64) -> Result<(), AppError> {
        let mut conn = self.manager.clone();
        conn.set_ex(RedisKeys::password_reset(token), user_id, expiry_seconds)
            .await
            .map_err(AppError::Redis)
    }

    pub async fn take_reset_token(&self, token: &str) -> Result<Option<String>, AppError> {
        let mut conn = self.manager.clone();
        let key = RedisKeys::password_reset(token);
        let user_id: Option<String> = conn.get(&key).await.map_err(AppError::Redis)?;
        if user_id.is_some() {
            let _: () = conn.del(&key).await.map_err(AppError::Redis)?;
        }
        Ok(user_id)
    }

    // Rate limiting, fixed window
    pub async fn check_rate_limit(&self, key: &str, limit: u32, window_seconds: u64) -> Result<bool, AppError> {
        let mut conn = self.manager.clone();
        let current: u32 = conn.incr(key, 1).await.map_err(AppError::Redis)?;

        if current == 1 {
            let _: () = conn
                .expire(key, window_seconds as i64)
                .await
                .map_err(AppError::Redis)?;
        }

        Ok(current <= limit)
    }

    // SET NX EX, used to stamp per-user promo windows
    pub async fn set_if_absent(&self, key: &str, value: &str, expiry_seconds: u64) -> Result<bool, AppError> {
        let mut conn = self.manager.clone();
        let outcome: Option<String> = ::redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(expiry_seconds)
            .query_async(&mut conn)
            .await
            .map_err(AppError::Redis)?;
        Ok(outcome.is_some())
    }

    // Caching
    pub async fn cache_set<T>(&self, key: &str, value: &T, expiry_seconds: u64) -> Result<(), AppError>
    where
        T: Serialize,
    {
        let mut conn = self.manager.clone();
        let serialized = serde_json::to_string(value)
            .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))?;

        conn.set_ex(key, serialized, expiry_seconds)
            .await
            .map_err(AppError::Redis)
    }

    pub async fn cache_get<T>(&self, key: &str) -> Result<Option<T>, AppError>
    where
        T: DeserializeOwned,
    {
        let mut conn = self.manager.clone();
        let result: Option<String> = conn.get(key).await.map_err(AppError::Redis)?;

        match result {
            Some(raw) => {
                let value = serde_json::from_str(&raw)
                    .map_err(|e| AppError::Internal(format!("Deserialization error: {}", e)))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    pub async fn cache_delete(&self, key: &str) -> Result<(), AppError> {
        let mut conn = self.manager.clone();
        conn.del(key).await.map_err(AppError::Redis)
    }
}
