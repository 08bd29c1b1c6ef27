//! Redis client with connection retry and the small command surface the
//! verification stores need

use std::time::Duration;

use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::CacheConfig;
use crate::InfrastructureError;

/// Thin async Redis wrapper over a multiplexed connection
///
/// The multiplexed connection is cheap to clone and safe to share; every
/// command clones it rather than locking.
#[derive(Clone)]
pub struct RedisClient {
    connection: MultiplexedConnection,
}

impl RedisClient {
    /// Connect with exponential-backoff retry per `config`
    pub async fn connect(config: &CacheConfig) -> Result<Self, InfrastructureError> {
        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!(error = %e, "Invalid Redis URL");
            InfrastructureError::Config(format!("invalid Redis URL: {}", e))
        })?;

        let mut attempts = 0;
        let mut delay = config.retry_delay_ms;

        let connection = loop {
            attempts += 1;
            match client.get_multiplexed_async_connection().await {
                Ok(connection) => {
                    info!(attempts, "Connected to Redis");
                    break connection;
                }
                Err(e) if attempts < config.max_retries => {
                    warn!(
                        attempt = attempts,
                        max = config.max_retries,
                        delay_ms = delay,
                        error = %e,
                        "Redis connection failed, retrying"
                    );
                    sleep(Duration::from_millis(delay)).await;
                    // Exponential backoff capped at 5 seconds
                    delay = (delay * 2).min(5000);
                }
                Err(e) => {
                    error!(attempts, error = %e, "Redis connection failed");
                    return Err(InfrastructureError::Cache(e));
                }
            }
        };

        Ok(Self { connection })
    }

    /// SET with a TTL in seconds
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        expiry_seconds: u64,
    ) -> Result<(), InfrastructureError> {
        let mut conn = self.connection.clone();
        conn.set_ex::<_, _, ()>(key, value, expiry_seconds).await?;
        debug!(key, expiry_seconds, "Set key");
        Ok(())
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    /// DEL; true when the key existed
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        let mut conn = self.connection.clone();
        let deleted: u32 = conn.del(key).await?;
        Ok(deleted > 0)
    }

    /// INCR that starts a fixed expiry window on first use
    ///
    /// When the increment creates the key (count of 1) an EXPIRE is attached,
    /// giving fixed-window semantics: the window runs from the first hit and
    /// the whole counter vanishes when it lapses.
    pub async fn increment_windowed(
        &self,
        key: &str,
        window_seconds: u64,
    ) -> Result<u64, InfrastructureError> {
        let mut conn = self.connection.clone();
        let count: u64 = conn.incr(key, 1u64).await?;
        if count == 1 {
            conn.expire::<_, ()>(key, window_seconds as i64).await?;
        }
        Ok(count)
    }

    /// Remaining TTL in seconds; `None` for missing or non-expiring keys
    pub async fn ttl(&self, key: &str) -> Result<Option<u64>, InfrastructureError> {
        let mut conn = self.connection.clone();
        let ttl: i64 = conn.ttl(key).await?;
        Ok(if ttl > 0 { Some(ttl as u64) } else { None })
    }

    /// PING round-trip
    pub async fn health_check(&self) -> Result<(), InfrastructureError> {
        let mut conn = self.connection.clone();
        redis::cmd("PING").query_async::<_, String>(&mut conn).await?;
        Ok(())
    }
}
