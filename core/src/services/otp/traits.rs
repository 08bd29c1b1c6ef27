//! Trait seams between the engine and the infrastructure layer

use async_trait::async_trait;

use crate::domain::entities::{OtpRecord, ProofToken};
use crate::domain::value_objects::PhoneKey;
use crate::errors::{SmsError, StoreError};

/// Receipt for a successfully delivered message
#[derive(Debug, Clone)]
pub struct SmsReceipt {
    /// Provider-assigned message identifier (may be empty)
    pub message_id: String,
}

/// Outbound SMS delivery
#[async_trait]
pub trait SmsGateway: Send + Sync {
    /// Send a raw text message to a phone key
    async fn send_sms(&self, destination: &PhoneKey, message: &str) -> Result<SmsReceipt, SmsError>;

    /// Send the standard verification message carrying `code`
    async fn send_verification_code(
        &self,
        destination: &PhoneKey,
        code: &str,
    ) -> Result<SmsReceipt, SmsError> {
        let message = format!("თქვენი ვერიფიკაციის კოდია: {}", code);
        self.send_sms(destination, &message).await
    }

    /// Whether provider credentials are present
    fn is_configured(&self) -> bool {
        true
    }
}

/// Expiring key-value store for codes and proof tokens
///
/// One key per call; no multi-key transactions are needed. Implementations
/// must provide at-least best-effort atomic set-with-TTL and get. Passive
/// TTL eviction is expected but not relied upon: the engine re-checks
/// `expires_at` on every read.
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Store the active code record, replacing any existing one
    async fn put_code(
        &self,
        phone: &PhoneKey,
        record: &OtpRecord,
        ttl_seconds: u64,
    ) -> Result<(), StoreError>;

    async fn get_code(&self, phone: &PhoneKey) -> Result<Option<OtpRecord>, StoreError>;

    async fn delete_code(&self, phone: &PhoneKey) -> Result<(), StoreError>;

    /// Store the active proof token, replacing any existing one
    async fn put_proof(&self, proof: &ProofToken, ttl_seconds: u64) -> Result<(), StoreError>;

    async fn get_proof(&self, phone: &PhoneKey) -> Result<Option<ProofToken>, StoreError>;

    async fn delete_proof(&self, phone: &PhoneKey) -> Result<(), StoreError>;
}

/// Fixed-window attempt limiting per (phone, origin) pair
///
/// Both counters use windows that start at the first recorded attempt and
/// reset once the window expires. Whether a store outage allows or denies is
/// the implementation's policy (see `RateLimitConfig::fail_open`).
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// True when another code may be sent for this pair
    async fn check_send(&self, phone: &PhoneKey, origin: &str) -> Result<bool, StoreError>;

    /// Record a successful send; creates the window on first use
    async fn record_send(&self, phone: &PhoneKey, origin: &str) -> Result<(), StoreError>;

    /// True when another verification attempt is allowed for this pair
    async fn check_verify(&self, phone: &PhoneKey, origin: &str) -> Result<bool, StoreError>;

    /// Record a failed verification attempt (wrong or expired code)
    async fn record_verify_failure(&self, phone: &PhoneKey, origin: &str)
        -> Result<(), StoreError>;

    /// Reset the verify counter after a successful verification
    async fn clear_verify(&self, phone: &PhoneKey, origin: &str) -> Result<(), StoreError>;
}
