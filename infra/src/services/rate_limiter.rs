//! Redis fixed-window rate limiter

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use av_core::domain::value_objects::PhoneKey;
use av_core::errors::StoreError;
use av_core::services::otp::RateLimiter;
use av_shared::config::{RateLimitConfig, WindowLimit};

use crate::cache::RedisClient;
use crate::InfrastructureError;

const SEND_KEY_PREFIX: &str = "rl:send:";
const VERIFY_KEY_PREFIX: &str = "rl:verify:";

/// Per-(phone, origin) fixed-window counters on Redis
///
/// Counter keys carry a SHA-256 digest of the pair rather than the raw
/// phone number, so the keyspace never exposes subscriber numbers. Each
/// window starts at the first recorded attempt (INCR creating the key
/// attaches the EXPIRE) and the counter disappears when the window lapses.
///
/// When Redis is unreachable the `fail_open` setting decides the policy:
/// open means verification stays available without limits, closed means the
/// store error propagates and the operation fails.
#[derive(Clone)]
pub struct RedisRateLimiter {
    client: RedisClient,
    config: RateLimitConfig,
}

impl RedisRateLimiter {
    pub fn new(client: RedisClient, config: RateLimitConfig) -> Self {
        Self { client, config }
    }

    fn pair_key(prefix: &str, phone: &PhoneKey, origin: &str) -> String {
        let digest = Sha256::digest(format!("{}:{}", phone.as_str(), origin).as_bytes());
        format!("{}{}", prefix, hex::encode(digest))
    }

    async fn check(
        &self,
        prefix: &str,
        limit: &WindowLimit,
        phone: &PhoneKey,
        origin: &str,
    ) -> Result<bool, StoreError> {
        if !self.config.enabled {
            return Ok(true);
        }

        let key = Self::pair_key(prefix, phone, origin);
        match self.client.get(&key).await {
            Ok(value) => {
                let count: u32 = value.and_then(|v| v.parse().ok()).unwrap_or(0);
                Ok(count < limit.max_attempts)
            }
            Err(e) => Self::on_store_error(self.config.fail_open, e, phone).map(|()| true),
        }
    }

    async fn record(
        &self,
        prefix: &str,
        limit: &WindowLimit,
        phone: &PhoneKey,
        origin: &str,
    ) -> Result<(), StoreError> {
        if !self.config.enabled {
            return Ok(());
        }

        let key = Self::pair_key(prefix, phone, origin);
        match self
            .client
            .increment_windowed(&key, limit.window_seconds)
            .await
        {
            Ok(count) => {
                debug!(phone = %phone.masked(), count, "Recorded rate-limit attempt");
                Ok(())
            }
            Err(e) => Self::on_store_error(self.config.fail_open, e, phone),
        }
    }

    /// Apply the fail-open policy to a Redis failure
    fn on_store_error(
        fail_open: bool,
        error: InfrastructureError,
        phone: &PhoneKey,
    ) -> Result<(), StoreError> {
        if fail_open {
            warn!(
                phone = %phone.masked(),
                error = %error,
                "Rate-limit store unavailable, allowing request"
            );
            Ok(())
        } else {
            Err(StoreError::new(error.to_string()))
        }
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check_send(&self, phone: &PhoneKey, origin: &str) -> Result<bool, StoreError> {
        self.check(SEND_KEY_PREFIX, &self.config.send, phone, origin)
            .await
    }

    async fn record_send(&self, phone: &PhoneKey, origin: &str) -> Result<(), StoreError> {
        self.record(SEND_KEY_PREFIX, &self.config.send, phone, origin)
            .await
    }

    async fn check_verify(&self, phone: &PhoneKey, origin: &str) -> Result<bool, StoreError> {
        self.check(VERIFY_KEY_PREFIX, &self.config.verify, phone, origin)
            .await
    }

    async fn record_verify_failure(
        &self,
        phone: &PhoneKey,
        origin: &str,
    ) -> Result<(), StoreError> {
        self.record(VERIFY_KEY_PREFIX, &self.config.verify, phone, origin)
            .await
    }

    async fn clear_verify(&self, phone: &PhoneKey, origin: &str) -> Result<(), StoreError> {
        if !self.config.enabled {
            return Ok(());
        }
        let key = Self::pair_key(VERIFY_KEY_PREFIX, phone, origin);
        match self.client.delete(&key).await {
            Ok(_) => Ok(()),
            Err(e) => Self::on_store_error(self.config.fail_open, e, phone),
        }
    }
}
