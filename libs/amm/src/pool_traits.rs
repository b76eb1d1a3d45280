//! Trait definitions for the pair and factory seams
//!
//! Read-only views of pairs and the registry. Quoting goes through these
//! traits; state changes are only reachable through [`crate::Exchange`],
//! which stages them and discards them on failure.

use crate::pair::Reserves;
use std::fmt;
use types::Address;

/// Unified pair view
pub trait PairHandle: fmt::Debug {
    fn address(&self) -> Address;

    fn factory(&self) -> Address;

    fn token0(&self) -> Address;

    fn token1(&self) -> Address;

    /// Liquidity token issued by this pair
    fn lp_token(&self) -> Address;

    fn reserves(&self) -> Reserves;
}

/// Pair registry view
pub trait PairFactory {
    fn address(&self) -> Address;

    /// Protocol fee recipient; `None` when the protocol fee is off
    fn fee_to(&self) -> Option<Address>;

    /// Registered pair for two assets, in either order
    fn get_pair(&self, token_a: &Address, token_b: &Address) -> Option<Address>;

    fn pair(&self, pair: &Address) -> Option<&dyn PairHandle>;
}
