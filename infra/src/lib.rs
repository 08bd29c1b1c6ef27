//! Infrastructure layer for the phone verification service
//!
//! Concrete implementations of the core trait seams: a Redis-backed
//! expiring store and rate limiter, and the msg.ge SMS gateway. Nothing in
//! here contains verification logic; that all lives in `av_core`.

pub mod cache;
pub mod config;
pub mod services;
pub mod sms;

use thiserror::Error;

pub use cache::{RedisClient, RedisOtpStore};
pub use config::CacheConfig;
pub use services::RedisRateLimiter;
pub use sms::MsgGeGateway;

/// Failures originating in the infrastructure layer
#[derive(Error, Debug)]
pub enum InfrastructureError {
    /// Redis connection or command failure
    #[error("cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Outbound HTTP failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid or missing configuration
    #[error("configuration error: {0}")]
    Config(String),
}

/// Load variables from a `.env` file if one is present
///
/// Missing files are fine; real environments set variables directly.
pub fn load_env() {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded environment from .env file");
    }
}
