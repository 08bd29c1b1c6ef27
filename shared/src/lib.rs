//! Shared configuration and utilities for the anketa-verify backend
//!
//! This crate provides common functionality used by the core and
//! infrastructure layers:
//! - Configuration types (OTP lifecycle, rate limits, SMS provider)
//! - Utility functions (phone normalization, caller-origin resolution)

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{OtpConfig, RateLimitConfig, SmsConfig, WindowLimit};
pub use utils::{origin, phone};
