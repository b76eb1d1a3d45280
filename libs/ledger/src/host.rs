//! # Asset Host
//!
//! [`AssetHost`] is the seam between the exchange core and whatever ledger holds
//! the assets. The core only needs identifier lookup, asset deployment (for
//! liquidity tokens) and a clock; every balance operation is a provided method
//! on top of those.
//!
//! [`Ledger`] is the in-memory host. Cloning a ledger deep-copies every asset,
//! which is what the exchange uses to stage a transaction and discard it on failure.

use crate::{FungibleAsset, LedgerError};
use std::collections::BTreeMap;
use tracing::debug;
use types::{Address, Amount};

/// Host ledger interface consumed by the exchange core
pub trait AssetHost {
    /// Current block time in seconds
    fn timestamp(&self) -> u64;

    fn asset(&self, id: &Address) -> Result<&dyn FungibleAsset, LedgerError>;

    fn asset_mut(&mut self, id: &Address) -> Result<&mut dyn FungibleAsset, LedgerError>;

    /// Register a new asset under `id`
    fn deploy(&mut self, id: Address, asset: Box<dyn FungibleAsset>) -> Result<(), LedgerError>;

    fn contains(&self, id: &Address) -> bool {
        self.asset(id).is_ok()
    }

    fn balance_of(&self, asset: &Address, owner: &Address) -> Result<Amount, LedgerError> {
        Ok(self.asset(asset)?.balance_of(owner))
    }

    fn total_supply(&self, asset: &Address) -> Result<Amount, LedgerError> {
        Ok(self.asset(asset)?.total_supply())
    }

    fn allowance(
        &self,
        asset: &Address,
        owner: &Address,
        spender: &Address,
    ) -> Result<Amount, LedgerError> {
        Ok(self.asset(asset)?.allowance(owner, spender))
    }

    fn approve(
        &mut self,
        asset: &Address,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<bool, LedgerError> {
        Ok(self.asset_mut(asset)?.approve(owner, spender, amount))
    }

    fn transfer(
        &mut self,
        asset: &Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<bool, LedgerError> {
        Ok(self.asset_mut(asset)?.transfer(from, to, amount))
    }

    fn transfer_from(
        &mut self,
        asset: &Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<bool, LedgerError> {
        Ok(self.asset_mut(asset)?.transfer_from(spender, from, to, amount))
    }

    fn mint(
        &mut self,
        asset: &Address,
        minter: Address,
        to: Address,
        amount: Amount,
    ) -> Result<bool, LedgerError> {
        Ok(self.asset_mut(asset)?.mint(minter, to, amount))
    }

    fn burn(
        &mut self,
        asset: &Address,
        minter: Address,
        from: Address,
        amount: Amount,
    ) -> Result<bool, LedgerError> {
        Ok(self.asset_mut(asset)?.burn(minter, from, amount))
    }
}

/// In-memory host holding every deployed asset and the block clock
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    assets: BTreeMap<Address, Box<dyn FungibleAsset>>,
    timestamp: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timestamp(timestamp: u64) -> Self {
        Self {
            assets: BTreeMap::new(),
            timestamp,
        }
    }

    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }

    pub fn advance_time(&mut self, seconds: u64) {
        self.timestamp = self.timestamp.saturating_add(seconds);
    }

    pub fn asset_ids(&self) -> impl Iterator<Item = &Address> {
        self.assets.keys()
    }
}

impl AssetHost for Ledger {
    fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn asset(&self, id: &Address) -> Result<&dyn FungibleAsset, LedgerError> {
        match self.assets.get(id) {
            Some(asset) => Ok(asset.as_ref()),
            None => Err(LedgerError::UnknownAsset(*id)),
        }
    }

    fn asset_mut(&mut self, id: &Address) -> Result<&mut dyn FungibleAsset, LedgerError> {
        match self.assets.get_mut(id) {
            Some(asset) => Ok(asset.as_mut()),
            None => Err(LedgerError::UnknownAsset(*id)),
        }
    }

    fn deploy(&mut self, id: Address, asset: Box<dyn FungibleAsset>) -> Result<(), LedgerError> {
        if id.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        if self.assets.contains_key(&id) {
            return Err(LedgerError::AssetExists(id));
        }
        debug!(asset = %id, symbol = asset.symbol(), "deployed asset");
        self.assets.insert(id, asset);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StandardToken;

    #[test]
    fn test_unknown_asset() {
        let ledger = Ledger::new();
        let id = Address::from_low_u64(7);
        assert_eq!(
            ledger.balance_of(&id, &Address::from_low_u64(1)),
            Err(LedgerError::UnknownAsset(id))
        );
    }

    #[test]
    fn test_deploy_rejects_duplicates_and_zero() {
        let mut ledger = Ledger::new();
        let id = Address::from_low_u64(7);

        ledger
            .deploy(id, Box::new(StandardToken::new("TKA", 18)))
            .unwrap();
        assert_eq!(
            ledger.deploy(id, Box::new(StandardToken::new("TKA", 18))),
            Err(LedgerError::AssetExists(id))
        );
        assert_eq!(
            ledger.deploy(Address::ZERO, Box::new(StandardToken::new("TKB", 18))),
            Err(LedgerError::ZeroAddress)
        );
    }

    #[test]
    fn test_clone_is_a_deep_copy() {
        let alice = Address::from_low_u64(1);
        let bob = Address::from_low_u64(2);
        let id = Address::from_low_u64(7);
        let mut ledger = Ledger::with_timestamp(100);
        ledger
            .deploy(
                id,
                Box::new(StandardToken::new("TKA", 18).with_balance(alice, Amount::from(50u64))),
            )
            .unwrap();

        let mut staged = ledger.clone();
        assert!(staged.transfer(&id, alice, bob, Amount::from(20u64)).unwrap());
        staged.advance_time(5);

        assert_eq!(ledger.balance_of(&id, &bob).unwrap(), Amount::zero());
        assert_eq!(staged.balance_of(&id, &bob).unwrap(), Amount::from(20u64));
        assert_eq!(ledger.timestamp(), 100);
        assert_eq!(staged.timestamp(), 105);
    }
}
