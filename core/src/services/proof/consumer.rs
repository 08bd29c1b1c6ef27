//! Proof token checks at the form-submission boundary

use std::sync::Arc;

use av_shared::config::OtpConfig;

use crate::domain::value_objects::PhoneKey;
use crate::errors::StoreError;
use crate::services::otp::OtpStore;

/// Validates proof tokens presented alongside form submissions
///
/// `is_verified` is a pure read: a valid proof stays in the store so several
/// checks within the token's lifetime all pass, and the store TTL is the
/// only thing that retires it. `redeem` is the stricter single-use variant
/// for flows that must not accept the same proof twice.
pub struct ProofConsumer<S: OtpStore> {
    store: Arc<S>,
    config: OtpConfig,
}

impl<S: OtpStore> ProofConsumer<S> {
    pub fn new(store: Arc<S>, config: OtpConfig) -> Self {
        Self { store, config }
    }

    /// Whether `presented` is the live proof token for `raw_phone`
    ///
    /// Every mismatch reason (bad phone, empty token, no proof, expired,
    /// wrong value) collapses to `false`; only store failures surface.
    pub async fn is_verified(
        &self,
        raw_phone: &str,
        presented: &str,
    ) -> Result<bool, StoreError> {
        let Some(phone) = PhoneKey::parse(raw_phone, &self.config) else {
            return Ok(false);
        };
        if presented.is_empty() {
            return Ok(false);
        }

        let valid = match self.store.get_proof(&phone).await? {
            Some(proof) => !proof.is_expired() && proof.matches(presented),
            None => false,
        };

        if valid {
            tracing::debug!(
                phone = %phone.masked(),
                event = "proof_accepted",
                "Proof token accepted"
            );
        } else {
            tracing::info!(
                phone = %phone.masked(),
                event = "proof_rejected",
                "Proof token rejected"
            );
        }
        Ok(valid)
    }

    /// Single-use variant: a successful check also deletes the proof
    pub async fn redeem(&self, raw_phone: &str, presented: &str) -> Result<bool, StoreError> {
        if !self.is_verified(raw_phone, presented).await? {
            return Ok(false);
        }
        // parse succeeded inside is_verified, so it succeeds here too
        if let Some(phone) = PhoneKey::parse(raw_phone, &self.config) {
            self.store.delete_proof(&phone).await?;
            tracing::info!(
                phone = %phone.masked(),
                event = "proof_redeemed",
                "Proof token redeemed"
            );
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    use crate::domain::entities::ProofToken;
    use crate::services::otp::tests::mocks::MemoryOtpStore;

    const PHONE: &str = "599620303";

    fn consumer() -> (ProofConsumer<MemoryOtpStore>, Arc<MemoryOtpStore>) {
        let store = Arc::new(MemoryOtpStore::new());
        (
            ProofConsumer::new(Arc::clone(&store), OtpConfig::default()),
            store,
        )
    }

    async fn seed_proof(store: &MemoryOtpStore) -> ProofToken {
        let phone = PhoneKey::parse(PHONE, &OtpConfig::default()).unwrap();
        let proof = ProofToken::issue(phone, 300);
        store.put_proof(&proof, 300).await.unwrap();
        proof
    }

    #[tokio::test]
    async fn accepts_live_proof_repeatedly() {
        let (consumer, store) = consumer();
        let proof = seed_proof(&store).await;

        assert!(consumer.is_verified(PHONE, &proof.token).await.unwrap());
        // Read-only check: the proof survives and passes again
        assert!(consumer.is_verified(PHONE, &proof.token).await.unwrap());
        // Raw input normalizes to the same key the proof was stored under
        assert!(consumer
            .is_verified("+995 599 62 03 03", &proof.token)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn rejects_wrong_missing_or_empty_tokens() {
        let (consumer, store) = consumer();
        let proof = seed_proof(&store).await;

        assert!(!consumer.is_verified(PHONE, "deadbeef").await.unwrap());
        assert!(!consumer.is_verified(PHONE, "").await.unwrap());
        assert!(!consumer
            .is_verified("597000000", &proof.token)
            .await
            .unwrap());
        assert!(!consumer.is_verified("12345", &proof.token).await.unwrap());
    }

    #[tokio::test]
    async fn rejects_expired_proof() {
        let (consumer, store) = consumer();
        let proof = seed_proof(&store).await;

        store
            .proofs
            .lock()
            .unwrap()
            .get_mut(PHONE)
            .unwrap()
            .expires_at = Utc::now() - Duration::seconds(1);

        assert!(!consumer.is_verified(PHONE, &proof.token).await.unwrap());
    }

    #[tokio::test]
    async fn redeem_is_single_use() {
        let (consumer, store) = consumer();
        let proof = seed_proof(&store).await;

        assert!(consumer.redeem(PHONE, &proof.token).await.unwrap());
        assert!(store
            .get_proof(&PhoneKey::parse(PHONE, &OtpConfig::default()).unwrap())
            .await
            .unwrap()
            .is_none());
        assert!(!consumer.redeem(PHONE, &proof.token).await.unwrap());
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let (consumer, store) = consumer();
        seed_proof(&store).await;
        *store.fail.lock().unwrap() = true;

        assert!(consumer.is_verified(PHONE, "anything").await.is_err());
    }
}
