//! OTP engine implementation

use std::sync::Arc;

use av_shared::config::OtpConfig;

use crate::domain::entities::{OtpRecord, ProofToken};
use crate::domain::value_objects::PhoneKey;
use crate::errors::{VerificationError, VerificationResult};

use super::traits::{OtpStore, RateLimiter, SmsGateway};
use super::types::{CodeRequested, PhoneVerified};

/// Orchestrates code issuance and verification
///
/// Holds no per-phone state of its own; everything lives in the injected
/// store so a request-per-call server model works without locking.
/// Concurrent `request_code` calls for the same key are last-writer-wins by
/// design: the rate limiter bounds the damage and only the same requester is
/// affected.
pub struct OtpEngine<G: SmsGateway, S: OtpStore, R: RateLimiter> {
    gateway: Arc<G>,
    store: Arc<S>,
    limiter: Arc<R>,
    config: OtpConfig,
}

impl<G: SmsGateway, S: OtpStore, R: RateLimiter> OtpEngine<G, S, R> {
    pub fn new(gateway: Arc<G>, store: Arc<S>, limiter: Arc<R>, config: OtpConfig) -> Self {
        Self {
            gateway,
            store,
            limiter,
            config,
        }
    }

    /// Issue and deliver a fresh one-time code
    ///
    /// A pending code for the same key is silently replaced; the send
    /// counter, not a cooldown error, is the actual throttle. On delivery
    /// failure the stored code stays valid and the counter is not charged,
    /// so the caller can retry without burning an attempt.
    pub async fn request_code(
        &self,
        raw_phone: &str,
        origin: &str,
    ) -> VerificationResult<CodeRequested> {
        let phone = PhoneKey::parse(raw_phone, &self.config).ok_or(VerificationError::InvalidPhone)?;

        if !self.limiter.check_send(&phone, origin).await? {
            tracing::warn!(
                phone = %phone.masked(),
                event = "send_rate_limited",
                "OTP request denied by send rate limit"
            );
            return Err(VerificationError::RateLimited);
        }

        let record = OtpRecord::issue(self.config.code_length, self.config.code_expiry_seconds);
        tracing::info!(
            phone = %phone.masked(),
            session_id = %record.id,
            event = "otp_generated",
            "Generated verification code"
        );

        self.store
            .put_code(&phone, &record, self.config.code_expiry_seconds)
            .await?;

        let receipt = match self
            .gateway
            .send_verification_code(&phone, &record.code)
            .await
        {
            Ok(receipt) => receipt,
            Err(reason) => {
                let err = VerificationError::from(reason);
                if err.is_operator_error() {
                    tracing::error!(
                        phone = %phone.masked(),
                        session_id = %record.id,
                        error = %err,
                        event = "otp_send_failed",
                        "SMS delivery failed; operator attention required"
                    );
                } else {
                    tracing::warn!(
                        phone = %phone.masked(),
                        session_id = %record.id,
                        error = %err,
                        event = "otp_send_failed",
                        "SMS delivery failed"
                    );
                }
                return Err(err);
            }
        };

        self.limiter.record_send(&phone, origin).await?;

        tracing::info!(
            phone = %phone.masked(),
            session_id = %record.id,
            message_id = %receipt.message_id,
            event = "otp_sent",
            "Verification code delivered"
        );

        Ok(CodeRequested {
            expires_in_seconds: self.config.code_expiry_seconds,
            message_id: receipt.message_id,
        })
    }

    /// Verify a submitted code and issue a proof token
    ///
    /// Ordering is load-bearing: the format check runs before any limiter or
    /// store access, the verify-limit check is a hard stop, and failed
    /// attempts are counted even when the code has merely expired so lockout
    /// cannot be waited out.
    pub async fn submit_code(
        &self,
        raw_phone: &str,
        code: &str,
        origin: &str,
    ) -> VerificationResult<PhoneVerified> {
        let phone =
            PhoneKey::parse(raw_phone, &self.config).ok_or(VerificationError::InvalidFormat)?;
        if code.len() != self.config.code_length || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(VerificationError::InvalidFormat);
        }

        if !self.limiter.check_verify(&phone, origin).await? {
            tracing::warn!(
                phone = %phone.masked(),
                event = "verify_locked_out",
                "Verification denied by attempt limit"
            );
            return Err(VerificationError::VerifyRateLimited);
        }

        let record = match self.store.get_code(&phone).await? {
            Some(record) if !record.is_expired() => record,
            stale => {
                if stale.is_some() {
                    // Lazily evict a record the store TTL has not caught yet
                    let _ = self.store.delete_code(&phone).await;
                }
                self.limiter.record_verify_failure(&phone, origin).await?;
                tracing::info!(
                    phone = %phone.masked(),
                    event = "otp_expired",
                    "Verification attempted against missing or expired code"
                );
                return Err(VerificationError::CodeExpired);
            }
        };

        if !record.matches(code) {
            self.limiter.record_verify_failure(&phone, origin).await?;
            tracing::warn!(
                phone = %phone.masked(),
                session_id = %record.id,
                event = "otp_verification_failed",
                "Submitted code did not match"
            );
            return Err(VerificationError::InvalidCode);
        }

        self.store.delete_code(&phone).await?;
        self.limiter.clear_verify(&phone, origin).await?;

        let proof = ProofToken::issue(phone.clone(), self.config.code_expiry_seconds);
        self.store
            .put_proof(&proof, self.config.code_expiry_seconds)
            .await?;

        tracing::info!(
            phone = %phone.masked(),
            session_id = %record.id,
            event = "otp_verified",
            "Phone verified, proof token issued"
        );

        Ok(PhoneVerified {
            proof_token: proof.token,
            verified_phone: phone.into_string(),
        })
    }

    pub fn config(&self) -> &OtpConfig {
        &self.config
    }
}
