//! Rate limiting configuration module

use serde::{Deserialize, Serialize};

/// A fixed-window attempt limit
///
/// The window starts when the first attempt is recorded and expires
/// `window_seconds` later; the counter then resets to zero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WindowLimit {
    /// Maximum attempts allowed inside one window
    pub max_attempts: u32,

    /// Window duration in seconds
    pub window_seconds: u64,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting. When disabled every check allows.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Limit on code sends per (phone, origin) pair
    pub send: WindowLimit,

    /// Limit on failed verification attempts per (phone, origin) pair
    pub verify: WindowLimit,

    /// Fail-open policy: when the limiter's backing store is unavailable,
    /// `true` allows the operation (availability over strict enforcement),
    /// `false` propagates the store error and denies it. Deployments that
    /// prefer strict lockout guarantees should set this to `false`.
    #[serde(default = "default_fail_open")]
    pub fail_open: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            send: WindowLimit {
                max_attempts: 3,
                window_seconds: 600, // 10 minutes
            },
            verify: WindowLimit {
                max_attempts: 5,
                window_seconds: 900, // 15 minutes
            },
            fail_open: default_fail_open(),
        }
    }
}

impl RateLimitConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env_parse("RATE_LIMIT_ENABLED", defaults.enabled),
            send: WindowLimit {
                max_attempts: env_parse("RATE_LIMIT_MAX_SENDS", defaults.send.max_attempts),
                window_seconds: env_parse("RATE_LIMIT_SEND_WINDOW_SECS", defaults.send.window_seconds),
            },
            verify: WindowLimit {
                max_attempts: env_parse("RATE_LIMIT_MAX_VERIFY_ATTEMPTS", defaults.verify.max_attempts),
                window_seconds: env_parse(
                    "RATE_LIMIT_VERIFY_WINDOW_SECS",
                    defaults.verify.window_seconds,
                ),
            },
            fail_open: env_parse("RATE_LIMIT_FAIL_OPEN", defaults.fail_open),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, fallback: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(fallback)
}

fn default_enabled() -> bool {
    true
}

fn default_fail_open() -> bool {
    true
}
