//! Infrastructure configuration

use serde::{Deserialize, Serialize};

/// Redis connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Maximum connection attempts before giving up
    pub max_retries: u32,

    /// Base delay between retries in milliseconds; doubles per attempt
    pub retry_delay_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl CacheConfig {
    /// Build from `REDIS_*` environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: std::env::var("REDIS_URL").unwrap_or(defaults.url),
            max_retries: env_parse("REDIS_MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_parse("REDIS_RETRY_DELAY_MS", defaults.retry_delay_ms),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
