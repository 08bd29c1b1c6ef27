//! End-to-end OTP flow against in-memory infrastructure

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use av_core::domain::entities::{OtpRecord, ProofToken};
use av_core::domain::value_objects::PhoneKey;
use av_core::errors::{SmsError, StoreError, VerificationError};
use av_core::services::otp::{OtpEngine, OtpStore, RateLimiter, SmsGateway, SmsReceipt};
use av_core::services::proof::ProofConsumer;
use av_shared::config::{OtpConfig, RateLimitConfig};
use chrono::{Duration, Utc};

const PHONE: &str = "599620303";
const ORIGIN: &str = "203.0.113.7";

struct CapturingGateway {
    last_message: Mutex<Option<String>>,
}

impl CapturingGateway {
    fn new() -> Self {
        Self {
            last_message: Mutex::new(None),
        }
    }

    fn last_code(&self) -> String {
        let message = self.last_message.lock().unwrap().clone().unwrap();
        message.rsplit(' ').next().unwrap().to_owned()
    }
}

#[async_trait]
impl SmsGateway for CapturingGateway {
    async fn send_sms(&self, _to: &PhoneKey, message: &str) -> Result<SmsReceipt, SmsError> {
        *self.last_message.lock().unwrap() = Some(message.to_owned());
        Ok(SmsReceipt {
            message_id: "it-1".to_owned(),
        })
    }
}

#[derive(Default)]
struct FakeStore {
    codes: Mutex<HashMap<String, OtpRecord>>,
    proofs: Mutex<HashMap<String, ProofToken>>,
}

#[async_trait]
impl OtpStore for FakeStore {
    async fn put_code(
        &self,
        phone: &PhoneKey,
        record: &OtpRecord,
        _ttl: u64,
    ) -> Result<(), StoreError> {
        self.codes
            .lock()
            .unwrap()
            .insert(phone.as_str().to_owned(), record.clone());
        Ok(())
    }

    async fn get_code(&self, phone: &PhoneKey) -> Result<Option<OtpRecord>, StoreError> {
        Ok(self.codes.lock().unwrap().get(phone.as_str()).cloned())
    }

    async fn delete_code(&self, phone: &PhoneKey) -> Result<(), StoreError> {
        self.codes.lock().unwrap().remove(phone.as_str());
        Ok(())
    }

    async fn put_proof(&self, proof: &ProofToken, _ttl: u64) -> Result<(), StoreError> {
        self.proofs
            .lock()
            .unwrap()
            .insert(proof.phone.as_str().to_owned(), proof.clone());
        Ok(())
    }

    async fn get_proof(&self, phone: &PhoneKey) -> Result<Option<ProofToken>, StoreError> {
        Ok(self.proofs.lock().unwrap().get(phone.as_str()).cloned())
    }

    async fn delete_proof(&self, phone: &PhoneKey) -> Result<(), StoreError> {
        self.proofs.lock().unwrap().remove(phone.as_str());
        Ok(())
    }
}

struct FakeLimiter {
    config: RateLimitConfig,
    sends: Mutex<HashMap<String, u32>>,
    verifies: Mutex<HashMap<String, u32>>,
}

impl FakeLimiter {
    fn new() -> Self {
        Self {
            config: RateLimitConfig::default(),
            sends: Mutex::new(HashMap::new()),
            verifies: Mutex::new(HashMap::new()),
        }
    }

    fn key(phone: &PhoneKey, origin: &str) -> String {
        format!("{}:{}", phone.as_str(), origin)
    }
}

#[async_trait]
impl RateLimiter for FakeLimiter {
    async fn check_send(&self, phone: &PhoneKey, origin: &str) -> Result<bool, StoreError> {
        let counts = self.sends.lock().unwrap();
        Ok(counts.get(&Self::key(phone, origin)).copied().unwrap_or(0)
            < self.config.send.max_attempts)
    }

    async fn record_send(&self, phone: &PhoneKey, origin: &str) -> Result<(), StoreError> {
        *self
            .sends
            .lock()
            .unwrap()
            .entry(Self::key(phone, origin))
            .or_insert(0) += 1;
        Ok(())
    }

    async fn check_verify(&self, phone: &PhoneKey, origin: &str) -> Result<bool, StoreError> {
        let counts = self.verifies.lock().unwrap();
        Ok(counts.get(&Self::key(phone, origin)).copied().unwrap_or(0)
            < self.config.verify.max_attempts)
    }

    async fn record_verify_failure(
        &self,
        phone: &PhoneKey,
        origin: &str,
    ) -> Result<(), StoreError> {
        *self
            .verifies
            .lock()
            .unwrap()
            .entry(Self::key(phone, origin))
            .or_insert(0) += 1;
        Ok(())
    }

    async fn clear_verify(&self, phone: &PhoneKey, origin: &str) -> Result<(), StoreError> {
        self.verifies.lock().unwrap().remove(&Self::key(phone, origin));
        Ok(())
    }
}

fn build() -> (
    OtpEngine<CapturingGateway, FakeStore, FakeLimiter>,
    ProofConsumer<FakeStore>,
    Arc<CapturingGateway>,
    Arc<FakeStore>,
) {
    let gateway = Arc::new(CapturingGateway::new());
    let store = Arc::new(FakeStore::default());
    let limiter = Arc::new(FakeLimiter::new());
    let engine = OtpEngine::new(
        Arc::clone(&gateway),
        Arc::clone(&store),
        Arc::clone(&limiter),
        OtpConfig::default(),
    );
    let consumer = ProofConsumer::new(Arc::clone(&store), OtpConfig::default());
    (engine, consumer, gateway, store)
}

#[tokio::test]
async fn request_verify_and_consume_proof() {
    let (engine, consumer, gateway, _) = build();

    let requested = engine.request_code(PHONE, ORIGIN).await.unwrap();
    assert_eq!(requested.expires_in_seconds, 300);

    let message = gateway.last_message.lock().unwrap().clone().unwrap();
    assert!(message.contains("ვერიფიკაციის კოდია"));

    let code = gateway.last_code();
    let verified = engine.submit_code(PHONE, &code, ORIGIN).await.unwrap();
    assert_eq!(verified.verified_phone, PHONE);
    assert!(verified.proof_token.len() >= 32);

    assert!(consumer
        .is_verified(PHONE, &verified.proof_token)
        .await
        .unwrap());
    // Read-only validation keeps the proof available
    assert!(consumer
        .is_verified(PHONE, &verified.proof_token)
        .await
        .unwrap());
    assert!(!consumer.is_verified(PHONE, "bogus-token").await.unwrap());
}

#[tokio::test]
async fn wrong_code_then_lockout_then_expired_proof() {
    let (engine, consumer, gateway, store) = build();

    engine.request_code(PHONE, ORIGIN).await.unwrap();
    let code = gateway.last_code();
    let wrong = if code == "000000" { "111111" } else { "000000" };

    for _ in 0..5 {
        let err = engine.submit_code(PHONE, wrong, ORIGIN).await.unwrap_err();
        assert!(matches!(err, VerificationError::InvalidCode));
    }
    let err = engine.submit_code(PHONE, &code, ORIGIN).await.unwrap_err();
    assert!(matches!(err, VerificationError::VerifyRateLimited));

    // A different origin is not locked out by this one's failures
    let verified = engine
        .submit_code(PHONE, &code, "198.51.100.9")
        .await
        .unwrap();

    // Back-date the proof; expired proofs are rejected
    store
        .proofs
        .lock()
        .unwrap()
        .get_mut(PHONE)
        .unwrap()
        .expires_at = Utc::now() - Duration::seconds(1);
    assert!(!consumer
        .is_verified(PHONE, &verified.proof_token)
        .await
        .unwrap());
}
