//! # Anketa Verify Core
//!
//! Core business logic and domain layer for the phone-verification backend.
//! This crate contains the OTP domain entities, the verification engine and
//! proof consumer, the trait seams implemented by the infrastructure layer,
//! and the error taxonomy shared across the workspace.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
