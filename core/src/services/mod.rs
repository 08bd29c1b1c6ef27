//! Business services

pub mod otp;
pub mod proof;

pub use otp::{CodeRequested, OtpEngine, OtpStore, PhoneVerified, RateLimiter, SmsGateway, SmsReceipt};
pub use proof::ProofConsumer;
