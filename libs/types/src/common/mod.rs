//! Common types shared across the exchange core

pub mod amount;
pub mod errors;
pub mod identifiers;
