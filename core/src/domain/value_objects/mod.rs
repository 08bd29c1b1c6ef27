//! Value objects

pub mod phone_key;

pub use phone_key::PhoneKey;
