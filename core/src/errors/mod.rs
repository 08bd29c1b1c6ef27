//! Error types for the verification core

pub mod types;

pub use types::{SmsError, StoreError, VerificationError, VerificationResult};
