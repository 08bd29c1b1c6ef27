//! Infrastructure-backed service implementations

pub mod rate_limiter;

pub use rate_limiter::RedisRateLimiter;
