//! Domain layer: entities and value objects

pub mod entities;
pub mod value_objects;

pub use entities::{OtpRecord, ProofToken};
pub use value_objects::PhoneKey;
