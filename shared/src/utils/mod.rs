//! Utility functions shared across layers

pub mod origin;
pub mod phone;
