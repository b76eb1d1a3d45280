//! # Exchange Core Types
//!
//! Shared identifier and amount types used by every crate in the workspace.
//!
//! ## Design Philosophy
//!
//! - **Exact Integers**: All token quantities are 256-bit unsigned integers ([`Amount`]),
//!   wide enough to hold products of two 112-bit reserves without overflow
//! - **Opaque Identifiers**: Assets, pairs, accounts and contracts share one 20-byte
//!   [`Address`] type with a total byte-wise order
//! - **Deterministic Derivation**: Contract identifiers are derived from Keccak-256
//!   digests, so the same inputs always produce the same identifier
//!
//! ## Quick Start
//!
//! ```rust
//! use types::{Address, Amount};
//!
//! let token: Address = "0x00000000000000000000000000000000000000aa".parse().unwrap();
//! let amount = Amount::from(1_000u64);
//! assert!(!token.is_zero());
//! assert_eq!(amount.low_u64(), 1_000);
//! ```

pub mod common;

pub use common::amount::{parse_amount, Amount, U256};
pub use common::errors::ValidationError;
pub use common::identifiers::Address;
