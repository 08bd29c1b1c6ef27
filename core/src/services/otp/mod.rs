//! OTP lifecycle engine
//!
//! `OtpEngine` owns the per-phone state machine
//! (`NONE -> CODE_PENDING -> VERIFIED -> NONE`) behind the two public
//! operations `request_code` and `submit_code`. Delivery, storage, and rate
//! limiting are injected through the traits in [`traits`].

pub mod engine;
pub mod traits;
pub mod types;

#[cfg(test)]
pub(crate) mod tests;

pub use engine::OtpEngine;
pub use traits::{OtpStore, RateLimiter, SmsGateway, SmsReceipt};
pub use types::{CodeRequested, PhoneVerified};
