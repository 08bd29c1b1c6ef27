//! OTP lifecycle configuration

use serde::{Deserialize, Serialize};

/// Configuration for OTP codes and proof tokens
///
/// The defaults mirror the production deployment: 6-digit codes, a 5-minute
/// validity window, and 9-digit Georgian local subscriber numbers behind the
/// `995` country prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpConfig {
    /// Number of digits in a verification code
    #[serde(default = "default_code_length")]
    pub code_length: usize,

    /// Lifetime of a stored code, in seconds. Proof tokens issued after a
    /// successful verification share the same TTL.
    #[serde(default = "default_code_expiry_seconds")]
    pub code_expiry_seconds: u64,

    /// Length of a canonical local phone key, in digits
    #[serde(default = "default_phone_key_length")]
    pub phone_key_length: usize,

    /// Country-code prefix recognized (and stripped) during normalization
    #[serde(default = "default_country_prefix")]
    pub country_prefix: String,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            code_expiry_seconds: default_code_expiry_seconds(),
            phone_key_length: default_phone_key_length(),
            country_prefix: default_country_prefix(),
        }
    }
}

impl OtpConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            code_length: env_parse("OTP_CODE_LENGTH", default_code_length()),
            code_expiry_seconds: env_parse("OTP_EXPIRY_SECONDS", default_code_expiry_seconds()),
            phone_key_length: env_parse("PHONE_KEY_LENGTH", default_phone_key_length()),
            country_prefix: std::env::var("PHONE_COUNTRY_PREFIX")
                .unwrap_or_else(|_| default_country_prefix()),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, fallback: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(fallback)
}

fn default_code_length() -> usize {
    6
}

fn default_code_expiry_seconds() -> u64 {
    300
}

fn default_phone_key_length() -> usize {
    9
}

fn default_country_prefix() -> String {
    "995".to_string()
}
