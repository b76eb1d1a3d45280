//! Pure helpers shared by the factory and the router
//!
//! Asset ordering, pair identity, and path quoting against the pairs
//! registered in a [`PairFactory`].

use crate::error::{AmmError, AmmResult};
use crate::factory::Factory;
use crate::pair::Pair;
use crate::pool_traits::{PairFactory, PairHandle};
use crate::v2_math::V2Math;
use types::{Address, Amount};

/// Canonical (byte-wise ascending) order of two distinct, non-zero assets
pub fn sort_assets(token_a: Address, token_b: Address) -> AmmResult<(Address, Address)> {
    if token_a == token_b {
        return Err(AmmError::IdenticalAddresses);
    }
    let (token0, token1) = if token_a < token_b {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    };
    if token0.is_zero() {
        return Err(AmmError::ZeroAddress);
    }
    Ok((token0, token1))
}

/// Deterministic pair identifier; the same for either argument order
pub fn pair_address(factory: &Address, token_a: &Address, token_b: &Address) -> AmmResult<Address> {
    let (token0, token1) = sort_assets(*token_a, *token_b)?;
    Ok(Address::derive(b"pair", &[factory, &token0, &token1]))
}

/// Registered pair for two assets
pub fn pair_for(
    factory: &dyn PairFactory,
    token_a: &Address,
    token_b: &Address,
) -> AmmResult<Address> {
    factory
        .get_pair(token_a, token_b)
        .ok_or(AmmError::PairNotFound(*token_a, *token_b))
}

pub(crate) fn handle<'a>(
    factory: &'a dyn PairFactory,
    pair: &Address,
) -> AmmResult<&'a dyn PairHandle> {
    factory.pair(pair).ok_or(AmmError::UnknownPair(*pair))
}

pub(crate) fn handle_mut<'a>(factory: &'a mut Factory, pair: &Address) -> AmmResult<&'a mut Pair> {
    factory.pair_mut(pair).ok_or(AmmError::UnknownPair(*pair))
}

/// Reserves of the pair for `(token_a, token_b)`, in that order
pub fn get_reserves(
    factory: &dyn PairFactory,
    token_a: &Address,
    token_b: &Address,
) -> AmmResult<(Amount, Amount)> {
    let (token0, _) = sort_assets(*token_a, *token_b)?;
    let pair = pair_for(factory, token_a, token_b)?;
    let reserves = handle(factory, &pair)?.reserves();
    if *token_a == token0 {
        Ok((reserves.reserve0, reserves.reserve1))
    } else {
        Ok((reserves.reserve1, reserves.reserve0))
    }
}

/// Amount at every node of `path` for an exact input
pub fn get_amounts_out(
    factory: &dyn PairFactory,
    amount_in: Amount,
    path: &[Address],
) -> AmmResult<Vec<Amount>> {
    if path.len() < 2 {
        return Err(AmmError::InvalidPath);
    }
    let mut amounts = Vec::with_capacity(path.len());
    amounts.push(amount_in);
    for (i, hop) in path.windows(2).enumerate() {
        let (reserve_in, reserve_out) = get_reserves(factory, &hop[0], &hop[1])?;
        amounts.push(V2Math::get_amount_out(amounts[i], reserve_in, reserve_out)?);
    }
    Ok(amounts)
}

/// Amount at every node of `path` for an exact output, computed backwards
pub fn get_amounts_in(
    factory: &dyn PairFactory,
    amount_out: Amount,
    path: &[Address],
) -> AmmResult<Vec<Amount>> {
    if path.len() < 2 {
        return Err(AmmError::InvalidPath);
    }
    let mut amounts = vec![Amount::zero(); path.len()];
    amounts[path.len() - 1] = amount_out;
    for i in (1..path.len()).rev() {
        let (reserve_in, reserve_out) = get_reserves(factory, &path[i - 1], &path[i])?;
        amounts[i - 1] = V2Math::get_amount_in(amounts[i], reserve_in, reserve_out)?;
    }
    Ok(amounts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_assets() {
        let low = Address::from_low_u64(1);
        let high = Address::from_low_u64(2);
        assert_eq!(sort_assets(high, low), Ok((low, high)));
        assert_eq!(sort_assets(low, high), Ok((low, high)));
        assert_eq!(sort_assets(low, low), Err(AmmError::IdenticalAddresses));
        assert_eq!(sort_assets(Address::ZERO, low), Err(AmmError::ZeroAddress));
    }

    #[test]
    fn test_pair_address_ignores_order() {
        let factory = Address::from_low_u64(0xfac);
        let a = Address::from_low_u64(1);
        let b = Address::from_low_u64(2);
        assert_eq!(
            pair_address(&factory, &a, &b),
            pair_address(&factory, &b, &a)
        );
        assert_ne!(
            pair_address(&factory, &a, &b),
            pair_address(&Address::from_low_u64(0xfad), &a, &b)
        );
    }
}
