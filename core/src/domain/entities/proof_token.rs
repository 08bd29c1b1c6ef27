//! Verification proof token entity

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::PhoneKey;

/// Entropy of a proof token in bytes (hex-encoded to twice as many chars)
pub const TOKEN_ENTROPY_BYTES: usize = 32;

/// Short-lived proof that a phone number passed OTP verification
///
/// Issued only by a successful `submit_code`; downstream form submission
/// presents the token back and the consumer checks it against the store.
/// The token value is independent of the OTP code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofToken {
    /// Opaque random token value, hex-encoded
    pub token: String,

    /// The verified phone key this proof belongs to
    pub phone: PhoneKey,

    /// Timestamp when the proof was issued
    pub issued_at: DateTime<Utc>,

    /// Timestamp when the proof expires
    pub expires_at: DateTime<Utc>,
}

impl ProofToken {
    /// Issue a fresh proof for a verified phone key
    pub fn issue(phone: PhoneKey, ttl_seconds: u64) -> Self {
        let mut bytes = [0u8; TOKEN_ENTROPY_BYTES];
        OsRng.fill_bytes(&mut bytes);

        let now = Utc::now();
        Self {
            token: hex::encode(bytes),
            phone,
            issued_at: now,
            expires_at: now + Duration::seconds(ttl_seconds as i64),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Constant-time comparison against a presented token
    pub fn matches(&self, presented: &str) -> bool {
        self.token.len() == presented.len()
            && constant_time_eq(self.token.as_bytes(), presented.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use av_shared::config::OtpConfig;

    fn phone() -> PhoneKey {
        PhoneKey::parse("599620303", &OtpConfig::default()).unwrap()
    }

    #[test]
    fn token_is_hex_with_full_entropy() {
        let proof = ProofToken::issue(phone(), 300);
        assert_eq!(proof.token.len(), TOKEN_ENTROPY_BYTES * 2);
        assert!(proof.token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn tokens_are_unique() {
        let a = ProofToken::issue(phone(), 300);
        let b = ProofToken::issue(phone(), 300);
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn matches_exact_token_only() {
        let proof = ProofToken::issue(phone(), 300);
        let presented = proof.token.clone();
        assert!(proof.matches(&presented));
        assert!(!proof.matches(&presented[..10]));
        assert!(!proof.matches(""));
    }

    #[test]
    fn expiry_is_lazy() {
        let mut proof = ProofToken::issue(phone(), 300);
        assert!(!proof.is_expired());
        proof.expires_at = Utc::now() - Duration::seconds(1);
        assert!(proof.is_expired());
    }
}
