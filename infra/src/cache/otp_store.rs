//! Redis-backed implementation of the core `OtpStore` seam

use async_trait::async_trait;
use tracing::{debug, warn};

use av_core::domain::entities::{OtpRecord, ProofToken};
use av_core::domain::value_objects::PhoneKey;
use av_core::errors::StoreError;
use av_core::services::otp::OtpStore;

use super::redis_client::RedisClient;

const CODE_KEY_PREFIX: &str = "otp:code:";
const PROOF_KEY_PREFIX: &str = "otp:proof:";

/// Expiring code and proof storage on Redis
///
/// Records are stored as JSON under per-phone keys with the TTL the engine
/// asks for; Redis expiry is the backstop, the engine's `expires_at` check
/// the authority.
#[derive(Clone)]
pub struct RedisOtpStore {
    client: RedisClient,
}

impl RedisOtpStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn code_key(phone: &PhoneKey) -> String {
        format!("{}{}", CODE_KEY_PREFIX, phone.as_str())
    }

    fn proof_key(phone: &PhoneKey) -> String {
        format!("{}{}", PROOF_KEY_PREFIX, phone.as_str())
    }
}

#[async_trait]
impl OtpStore for RedisOtpStore {
    async fn put_code(
        &self,
        phone: &PhoneKey,
        record: &OtpRecord,
        ttl_seconds: u64,
    ) -> Result<(), StoreError> {
        let payload = serde_json::to_string(record)
            .map_err(|e| StoreError::new(format!("serialize code record: {}", e)))?;
        self.client
            .set_with_expiry(&Self::code_key(phone), &payload, ttl_seconds)
            .await
            .map_err(|e| StoreError::new(e.to_string()))?;
        debug!(phone = %phone.masked(), ttl_seconds, "Stored code record");
        Ok(())
    }

    async fn get_code(&self, phone: &PhoneKey) -> Result<Option<OtpRecord>, StoreError> {
        let payload = self
            .client
            .get(&Self::code_key(phone))
            .await
            .map_err(|e| StoreError::new(e.to_string()))?;

        match payload {
            Some(json) => match serde_json::from_str(&json) {
                Ok(record) => Ok(Some(record)),
                Err(e) => {
                    // Unreadable record is as good as absent; drop it
                    warn!(phone = %phone.masked(), error = %e, "Discarding corrupt code record");
                    let _ = self.client.delete(&Self::code_key(phone)).await;
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn delete_code(&self, phone: &PhoneKey) -> Result<(), StoreError> {
        self.client
            .delete(&Self::code_key(phone))
            .await
            .map_err(|e| StoreError::new(e.to_string()))?;
        Ok(())
    }

    async fn put_proof(&self, proof: &ProofToken, ttl_seconds: u64) -> Result<(), StoreError> {
        let payload = serde_json::to_string(proof)
            .map_err(|e| StoreError::new(format!("serialize proof token: {}", e)))?;
        self.client
            .set_with_expiry(&Self::proof_key(&proof.phone), &payload, ttl_seconds)
            .await
            .map_err(|e| StoreError::new(e.to_string()))?;
        debug!(phone = %proof.phone.masked(), ttl_seconds, "Stored proof token");
        Ok(())
    }

    async fn get_proof(&self, phone: &PhoneKey) -> Result<Option<ProofToken>, StoreError> {
        let payload = self
            .client
            .get(&Self::proof_key(phone))
            .await
            .map_err(|e| StoreError::new(e.to_string()))?;

        match payload {
            Some(json) => match serde_json::from_str(&json) {
                Ok(proof) => Ok(Some(proof)),
                Err(e) => {
                    warn!(phone = %phone.masked(), error = %e, "Discarding corrupt proof token");
                    let _ = self.client.delete(&Self::proof_key(phone)).await;
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn delete_proof(&self, phone: &PhoneKey) -> Result<(), StoreError> {
        self.client
            .delete(&Self::proof_key(phone))
            .await
            .map_err(|e| StoreError::new(e.to_string()))?;
        Ok(())
    }
}
