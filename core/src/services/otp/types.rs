//! Result types for the public engine operations

/// Successful outcome of `request_code`
#[derive(Debug, Clone)]
pub struct CodeRequested {
    /// Validity window of the stored code, for the frontend countdown
    pub expires_in_seconds: u64,

    /// Provider message id of the delivered SMS
    pub message_id: String,
}

/// Successful outcome of `submit_code`
#[derive(Debug, Clone)]
pub struct PhoneVerified {
    /// Opaque proof token the frontend attaches to the form submission
    pub proof_token: String,

    /// Canonical phone key that was verified
    pub verified_phone: String,
}
