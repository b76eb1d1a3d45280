//! Fungible asset interface

use std::fmt;
use types::{Address, Amount};

/// A fungible asset as seen by the exchange core
///
/// There is no ambient message sender, so every mutating call names the acting
/// identity explicitly: `from` for direct transfers, `spender` for delegated
/// transfers and `minter` for supply changes. Mutations return `false` instead of
/// panicking when they cannot be applied, and leave the asset untouched in that case.
pub trait FungibleAsset: fmt::Debug {
    fn symbol(&self) -> &str;

    fn decimals(&self) -> u8;

    fn total_supply(&self) -> Amount;

    fn balance_of(&self, owner: &Address) -> Amount;

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount;

    fn approve(&mut self, owner: Address, spender: Address, amount: Amount) -> bool;

    /// Move `amount` from `from` to `to`
    fn transfer(&mut self, from: Address, to: Address, amount: Amount) -> bool;

    /// Move `amount` from `from` to `to` on behalf of `spender`, consuming allowance
    fn transfer_from(&mut self, spender: Address, from: Address, to: Address, amount: Amount)
        -> bool;

    /// Create `amount` new units for `to`; only the asset's minter may call this
    fn mint(&mut self, minter: Address, to: Address, amount: Amount) -> bool;

    /// Destroy `amount` units held by `from`; only the asset's minter may call this
    fn burn(&mut self, minter: Address, from: Address, amount: Amount) -> bool;

    fn box_clone(&self) -> Box<dyn FungibleAsset>;
}

impl Clone for Box<dyn FungibleAsset> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}
