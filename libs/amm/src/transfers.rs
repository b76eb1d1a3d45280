//! Host ledger calls that must succeed
//!
//! Asset operations report failure as `false`; these wrappers turn that into
//! [`AmmError::TransferFailed`] so callers can propagate with `?`.

use crate::error::{AmmError, AmmResult};
use ledger::AssetHost;
use types::{Address, Amount};

fn ensure(ok: bool, asset: &Address) -> AmmResult<()> {
    if ok {
        Ok(())
    } else {
        Err(AmmError::TransferFailed { asset: *asset })
    }
}

pub(crate) fn transfer(
    host: &mut dyn AssetHost,
    asset: &Address,
    from: Address,
    to: Address,
    amount: Amount,
) -> AmmResult<()> {
    ensure(host.transfer(asset, from, to, amount)?, asset)
}

pub(crate) fn transfer_from(
    host: &mut dyn AssetHost,
    asset: &Address,
    spender: Address,
    from: Address,
    to: Address,
    amount: Amount,
) -> AmmResult<()> {
    ensure(host.transfer_from(asset, spender, from, to, amount)?, asset)
}

pub(crate) fn mint(
    host: &mut dyn AssetHost,
    asset: &Address,
    minter: Address,
    to: Address,
    amount: Amount,
) -> AmmResult<()> {
    ensure(host.mint(asset, minter, to, amount)?, asset)
}

pub(crate) fn burn(
    host: &mut dyn AssetHost,
    asset: &Address,
    minter: Address,
    from: Address,
    amount: Amount,
) -> AmmResult<()> {
    ensure(host.burn(asset, minter, from, amount)?, asset)
}
