//! # Factory Registry
//!
//! Creates pairs at deterministic identifiers, keeps the two-way lookup from
//! asset pairs to pair identifiers and the append-only list of all pairs, and
//! holds the protocol fee settings that every pair consults on mint and burn.

use crate::error::{AmmError, AmmResult};
use crate::library;
use crate::pair::Pair;
use crate::pool_traits::{PairFactory, PairHandle};
use exchange_config::FactorySettings;
use ledger::AssetHost;
use std::collections::{BTreeMap, HashMap};
use tracing::info;
use types::Address;

#[derive(Debug, Clone)]
pub struct Factory {
    address: Address,
    fee_to: Option<Address>,
    fee_to_setter: Address,
    lookup: HashMap<(Address, Address), Address>,
    all_pairs: Vec<Address>,
    pairs: BTreeMap<Address, Pair>,
}

impl Factory {
    pub fn new(address: Address, fee_to_setter: Address) -> Self {
        Self {
            address,
            fee_to: None,
            fee_to_setter,
            lookup: HashMap::new(),
            all_pairs: Vec::new(),
            pairs: BTreeMap::new(),
        }
    }

    pub fn from_settings(address: Address, settings: &FactorySettings) -> Self {
        let mut factory = Self::new(address, settings.fee_to_setter);
        factory.fee_to = settings.fee_to;
        factory
    }

    pub fn fee_to_setter(&self) -> Address {
        self.fee_to_setter
    }

    /// Every pair in creation order
    pub fn all_pairs(&self) -> &[Address] {
        &self.all_pairs
    }

    pub fn all_pairs_length(&self) -> usize {
        self.all_pairs.len()
    }

    /// Concrete pair state, for views the [`PairHandle`] trait does not cover
    pub fn pair_state(&self, pair: &Address) -> Option<&Pair> {
        self.pairs.get(pair)
    }

    pub fn set_fee_to(&mut self, caller: Address, fee_to: Option<Address>) -> AmmResult<()> {
        if caller != self.fee_to_setter {
            return Err(AmmError::Forbidden);
        }
        self.fee_to = fee_to;
        info!(factory = %self.address, fee_to = ?fee_to, "protocol fee recipient changed");
        Ok(())
    }

    pub fn set_fee_to_setter(&mut self, caller: Address, fee_to_setter: Address) -> AmmResult<()> {
        if caller != self.fee_to_setter {
            return Err(AmmError::Forbidden);
        }
        self.fee_to_setter = fee_to_setter;
        info!(factory = %self.address, %fee_to_setter, "fee authority changed");
        Ok(())
    }

    pub(crate) fn pair_mut(&mut self, pair: &Address) -> Option<&mut Pair> {
        self.pairs.get_mut(pair)
    }

    /// Create, initialize and register the pair for two assets
    pub(crate) fn create_pair(
        &mut self,
        host: &mut dyn AssetHost,
        token_a: Address,
        token_b: Address,
    ) -> AmmResult<Address> {
        let (token0, token1) = library::sort_assets(token_a, token_b)?;
        // both directions are always inserted together
        if self.lookup.contains_key(&(token0, token1)) {
            return Err(AmmError::PairExists);
        }

        let address = library::pair_address(&self.address, &token0, &token1)?;
        let mut pair = Pair::new(address, self.address);
        pair.initialize(host, self.address, token0, token1)?;

        self.lookup.insert((token0, token1), address);
        self.lookup.insert((token1, token0), address);
        self.all_pairs.push(address);
        self.pairs.insert(address, pair);

        info!(
            factory = %self.address,
            %token0,
            %token1,
            pair = %address,
            index = self.all_pairs.len(),
            "pair created"
        );
        Ok(address)
    }
}

impl PairFactory for Factory {
    fn address(&self) -> Address {
        self.address
    }

    fn fee_to(&self) -> Option<Address> {
        self.fee_to
    }

    fn get_pair(&self, token_a: &Address, token_b: &Address) -> Option<Address> {
        self.lookup.get(&(*token_a, *token_b)).copied()
    }

    fn pair(&self, pair: &Address) -> Option<&dyn PairHandle> {
        self.pairs.get(pair).map(|p| p as &dyn PairHandle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger::Ledger;

    fn factory() -> Factory {
        Factory::new(Address::from_low_u64(0xfac), Address::from_low_u64(0x5e7))
    }

    #[test]
    fn test_create_pair_registers_both_directions() {
        let mut host = Ledger::new();
        let mut factory = factory();
        let a = Address::from_low_u64(2);
        let b = Address::from_low_u64(1);

        let pair = factory.create_pair(&mut host, a, b).unwrap();

        assert_eq!(factory.get_pair(&a, &b), Some(pair));
        assert_eq!(factory.get_pair(&b, &a), Some(pair));
        assert_eq!(factory.all_pairs(), &[pair]);
        assert_eq!(factory.all_pairs_length(), 1);

        let handle = factory.pair(&pair).unwrap();
        assert_eq!(handle.token0(), b);
        assert_eq!(handle.token1(), a);
        assert_eq!(handle.factory(), factory.address());
        assert!(host.contains(&handle.lp_token()));
    }

    #[test]
    fn test_pair_exists_in_either_order() {
        let mut host = Ledger::new();
        let mut factory = factory();
        let a = Address::from_low_u64(1);
        let b = Address::from_low_u64(2);

        factory.create_pair(&mut host, a, b).unwrap();
        assert_eq!(
            factory.create_pair(&mut host, b, a),
            Err(AmmError::PairExists)
        );
        assert_eq!(
            factory.create_pair(&mut host, a, b),
            Err(AmmError::PairExists)
        );
        assert_eq!(factory.all_pairs_length(), 1);
    }

    #[test]
    fn test_create_pair_rejects_bad_assets() {
        let mut host = Ledger::new();
        let mut factory = factory();
        let a = Address::from_low_u64(1);

        assert_eq!(
            factory.create_pair(&mut host, a, a),
            Err(AmmError::IdenticalAddresses)
        );
        assert_eq!(
            factory.create_pair(&mut host, a, Address::ZERO),
            Err(AmmError::ZeroAddress)
        );
    }

    #[test]
    fn test_missing_pair_is_none() {
        let factory = factory();
        assert_eq!(
            factory.get_pair(&Address::from_low_u64(1), &Address::from_low_u64(2)),
            None
        );
    }

    #[test]
    fn test_pair_address_is_deterministic() {
        let mut host = Ledger::new();
        let mut factory = factory();
        let a = Address::from_low_u64(1);
        let b = Address::from_low_u64(2);

        let pair = factory.create_pair(&mut host, b, a).unwrap();
        assert_eq!(
            pair,
            library::pair_address(&factory.address(), &a, &b).unwrap()
        );
    }

    #[test]
    fn test_fee_settings_are_access_controlled() {
        let mut factory = factory();
        let setter = factory.fee_to_setter();
        let stranger = Address::from_low_u64(0xbad);
        let recipient = Address::from_low_u64(0xfee);

        assert_eq!(
            factory.set_fee_to(stranger, Some(recipient)),
            Err(AmmError::Forbidden)
        );
        factory.set_fee_to(setter, Some(recipient)).unwrap();
        assert_eq!(factory.fee_to(), Some(recipient));

        assert_eq!(
            factory.set_fee_to_setter(stranger, stranger),
            Err(AmmError::Forbidden)
        );
        factory.set_fee_to_setter(setter, stranger).unwrap();
        assert_eq!(factory.fee_to_setter(), stranger);
        assert_eq!(factory.set_fee_to(setter, None), Err(AmmError::Forbidden));
        factory.set_fee_to(stranger, None).unwrap();
        assert_eq!(factory.fee_to(), None);
    }
}
