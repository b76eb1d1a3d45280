//! # Address Identifiers
//!
//! A single 20-byte identifier type names every participant in the exchange:
//! fungible assets, liquidity pairs, the factory, the router and user accounts.
//!
//! ## Ordering
//!
//! [`Address`] derives `Ord` from its bytes, giving the total, deterministic order
//! used to canonicalize asset pairs (`asset0 < asset1`).
//!
//! ## Derivation
//!
//! Contract identifiers are derived with [`Address::derive`]: the last 20 bytes of
//! `keccak256(domain || part_0 || part_1 || ...)`. Derivation is pure, so every
//! caller that knows the inputs can compute the identifier without a lookup.

use crate::ValidationError;
use ethereum_types::H160;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

/// 20-byte identifier for assets, pairs and accounts
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(H160);

impl Address {
    /// The all-zero identifier. Never a valid asset; used as the permanent burn sink.
    pub const ZERO: Address = Address(H160([0u8; 20]));

    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(H160(bytes))
    }

    /// Identifier whose low 8 bytes hold `value` big-endian; handy for fixtures
    pub fn from_low_u64(value: u64) -> Self {
        Self(H160::from_low_u64_be(value))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0 .0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Derive a contract identifier from a domain tag and a sequence of identifiers
    pub fn derive(domain: &[u8], parts: &[&Address]) -> Self {
        let mut hasher = Keccak256::new();
        hasher.update(domain);
        for part in parts {
            hasher.update(part.as_bytes());
        }
        let digest = hasher.finalize();
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest[12..]);
        Self::from_bytes(bytes)
    }
}

impl From<H160> for Address {
    fn from(value: H160) -> Self {
        Self(value)
    }
}

impl From<Address> for H160 {
    fn from(value: Address) -> Self {
        value.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.as_bytes()))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let hex_clean = input.strip_prefix("0x").unwrap_or(input);

        if hex_clean.len() != 40 {
            return Err(ValidationError::InvalidAddress {
                input: input.to_string(),
                reason: format!("expected 40 hex characters, got {}", hex_clean.len()),
            });
        }

        let decoded = hex::decode(hex_clean).map_err(|e| ValidationError::InvalidAddress {
            input: input.to_string(),
            reason: e.to_string(),
        })?;

        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&decoded);
        Ok(Self::from_bytes(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
