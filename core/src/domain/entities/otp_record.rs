//! One-time verification code entity

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An active one-time code for a phone key
///
/// Exactly one record may exist per phone key at a time; issuing a new one
/// replaces the previous record outright. Expiry is enforced lazily at read
/// time via `expires_at` in addition to the store's own TTL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Correlation id for logs; never shown to users
    pub id: Uuid,

    /// The zero-padded numeric code
    pub code: String,

    /// Timestamp when the code was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the code expires
    pub expires_at: DateTime<Utc>,
}

impl OtpRecord {
    /// Issue a new record with a freshly generated code
    pub fn issue(code_length: usize, ttl_seconds: u64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            code: Self::generate_code(code_length),
            created_at: now,
            expires_at: now + Duration::seconds(ttl_seconds as i64),
        }
    }

    /// Generate a random numeric code of `length` digits
    ///
    /// Each digit is drawn uniformly from the OS CSPRNG; `gen_range` performs
    /// rejection sampling internally so there is no modulo bias.
    fn generate_code(length: usize) -> String {
        let mut rng = OsRng;
        (0..length)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect()
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Constant-time comparison against a submitted code
    ///
    /// Exact match only: a length mismatch fails immediately, which reveals
    /// nothing useful since the code length is public.
    pub fn matches(&self, submitted: &str) -> bool {
        self.code.len() == submitted.len()
            && constant_time_eq(self.code.as_bytes(), submitted.as_bytes())
    }

    /// Seconds until expiry, clamped at zero
    pub fn remaining_seconds(&self) -> u64 {
        let remaining = self.expires_at - Utc::now();
        remaining.num_seconds().max(0) as u64
    }
}
