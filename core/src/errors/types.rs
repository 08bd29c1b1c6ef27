//! Error taxonomy for the OTP lifecycle
//!
//! Expected failure conditions are modeled as tagged variants and returned,
//! never thrown; only backing-store failures propagate as `Store`. The
//! `Display` strings carry operator-grade detail for logs, while
//! `user_message` yields the short strings shown to end users.

use thiserror::Error;

/// Result alias for verification operations
pub type VerificationResult<T> = Result<T, VerificationError>;

/// Closed set of SMS delivery failure reasons
///
/// Every provider response that is not a recognized success code maps into
/// one of these; nothing is ever silently treated as success.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SmsError {
    /// Provider credentials are missing from configuration
    #[error("SMS API not configured")]
    NotConfigured,

    /// Provider rejected the credentials (or the caller IP is forbidden)
    #[error("invalid API credentials or forbidden IP")]
    BadCredentials,

    /// Provider rejected the destination number
    #[error("provider rejected destination number")]
    InvalidDestination,

    /// Provider account has no SMS balance left
    #[error("insufficient SMS balance")]
    InsufficientBalance,

    /// The outbound request itself failed (connect, timeout, TLS)
    #[error("SMS transport error: {0}")]
    Transport(String),

    /// Response body did not match any known success or error shape
    #[error("unexpected SMS provider response")]
    UnexpectedResponse,
}

/// Failure of the expiring backing store
#[derive(Error, Debug, Clone)]
#[error("store error: {message}")]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failures of the public verification operations
#[derive(Error, Debug)]
pub enum VerificationError {
    /// Phone input did not normalize to a valid key (`request_code`)
    #[error("invalid phone number")]
    InvalidPhone,

    /// Phone or code failed the format precheck (`submit_code`)
    #[error("invalid phone or code format")]
    InvalidFormat,

    /// Send counter exhausted for this (phone, origin) pair
    #[error("code request rate limit exceeded")]
    RateLimited,

    /// Verify counter exhausted; hard stop, no state is mutated
    #[error("verification attempt limit exceeded")]
    VerifyRateLimited,

    /// No active code for this phone (never issued, consumed, or expired)
    #[error("verification code expired or missing")]
    CodeExpired,

    /// Submitted code did not match the stored one
    #[error("invalid verification code")]
    InvalidCode,

    /// SMS delivery failed; the stored code remains valid
    #[error("SMS delivery failed: {0}")]
    Sms(#[from] SmsError),

    /// Backing store unreachable or misbehaving
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl VerificationError {
    /// Short message safe to show to end users
    ///
    /// Never leaks internal codes, tokens, or provider detail. Operator
    /// conditions (missing config, bad credentials, transport trouble)
    /// collapse into one generic sentence; the specifics go to logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidPhone => "Invalid phone number. Must be 9 digits.",
            Self::InvalidFormat => "Invalid phone or code format.",
            Self::RateLimited => "Too many attempts. Please try again later.",
            Self::VerifyRateLimited => {
                "Too many failed verification attempts. Please wait 15 minutes and try again."
            }
            Self::CodeExpired => "OTP expired. Please request a new code.",
            Self::InvalidCode => "Invalid OTP code.",
            Self::Sms(SmsError::InvalidDestination) => "Invalid phone number.",
            Self::Sms(SmsError::InsufficientBalance) => "Insufficient SMS balance.",
            Self::Sms(_) => "SMS sending failed. Please try again later.",
            Self::Store(_) => "Verification is temporarily unavailable. Please try again later.",
        }
    }

    /// Conditions an operator must fix; logged at error level with detail
    pub fn is_operator_error(&self) -> bool {
        matches!(
            self,
            Self::Sms(SmsError::NotConfigured) | Self::Sms(SmsError::BadCredentials)
        )
    }
}
