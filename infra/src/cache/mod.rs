//! Redis-backed expiring storage

pub mod otp_store;
pub mod redis_client;

pub use otp_store::RedisOtpStore;
pub use redis_client::RedisClient;
