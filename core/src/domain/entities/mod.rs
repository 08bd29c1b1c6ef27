//! Domain entities

pub mod otp_record;
pub mod proof_token;

pub use otp_record::OtpRecord;
pub use proof_token::ProofToken;
