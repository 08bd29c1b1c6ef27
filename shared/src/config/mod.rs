//! Configuration types for the verification backend

pub mod otp;
pub mod rate_limit;
pub mod sms;

pub use otp::OtpConfig;
pub use rate_limit::{RateLimitConfig, WindowLimit};
pub use sms::SmsConfig;
