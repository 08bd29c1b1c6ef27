//! Proof token validation for downstream form handling

pub mod consumer;

pub use consumer::ProofConsumer;
