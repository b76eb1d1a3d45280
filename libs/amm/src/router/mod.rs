//! # Router
//!
//! User-facing entry points over the pairs registered in a factory: liquidity
//! provision and removal, and exact-input / exact-output swaps along a path of
//! assets. The router holds no reserves. It pulls the caller's funds straight
//! into the first pair (the caller must have approved the router as spender),
//! and intermediate hops send their output directly to the next pair.
//!
//! Trading and liquidity entry points move funds in place, so they are only
//! reachable through [`crate::Exchange`], which stages the host and factory.
//!
//! Every trading entry point checks, in order, the deadline, the caller's
//! blacklist status and the pause flag. Swaps additionally pay a platform fee
//! on the input to the treasury, part of which goes to a referrer when one is
//! named.

mod liquidity;
mod swap;

pub use liquidity::{AddLiquidity, LiquidityAdded, LiquidityRemoved, RemoveLiquidity};
pub use swap::{ExactInput, ExactOutput};

use crate::error::{AmmError, AmmResult};
use crate::factory::Factory;
use crate::transfers;
use crate::v2_math::{V2Math, BASIS_POINTS};
use exchange_config::RouterSettings;
use ledger::AssetHost;
use std::collections::BTreeSet;
use tracing::{debug, info};
use types::{Address, Amount};

/// Staged collaborators a router call operates on
pub(crate) struct Context<'a> {
    pub(crate) host: &'a mut dyn AssetHost,
    pub(crate) factory: &'a mut Factory,
}

impl<'a> Context<'a> {
    pub(crate) fn new(host: &'a mut dyn AssetHost, factory: &'a mut Factory) -> Self {
        Self { host, factory }
    }
}

#[derive(Debug, Clone)]
pub struct Router {
    address: Address,
    owner: Address,
    treasury: Address,
    platform_fee_bps: u32,
    referral_fee_bps: u32,
    paused: bool,
    blacklist: BTreeSet<Address>,
}

impl Router {
    pub fn new(address: Address, settings: &RouterSettings) -> AmmResult<Self> {
        validate_fees(settings.platform_fee_bps, settings.referral_fee_bps)?;
        if settings.treasury.is_zero() {
            return Err(AmmError::ZeroAddress);
        }
        Ok(Self {
            address,
            owner: settings.owner,
            treasury: settings.treasury,
            platform_fee_bps: settings.platform_fee_bps,
            referral_fee_bps: settings.referral_fee_bps,
            paused: false,
            blacklist: BTreeSet::new(),
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn treasury(&self) -> Address {
        self.treasury
    }

    pub fn platform_fee_bps(&self) -> u32 {
        self.platform_fee_bps
    }

    pub fn referral_fee_bps(&self) -> u32 {
        self.referral_fee_bps
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_blacklisted(&self, account: &Address) -> bool {
        self.blacklist.contains(account)
    }

    /// Deadline, blacklist and pause checks, in that order
    fn guard(&self, host: &dyn AssetHost, caller: &Address, deadline: u64) -> AmmResult<()> {
        let now = host.timestamp();
        if deadline < now {
            return Err(AmmError::Expired { deadline, now });
        }
        if self.blacklist.contains(caller) {
            return Err(AmmError::Blacklisted(*caller));
        }
        if self.paused {
            return Err(AmmError::Paused);
        }
        Ok(())
    }

    /// Platform fee on `amount_in`: `(total, referral share)`
    pub fn platform_fee(
        &self,
        amount_in: Amount,
        referrer: Option<Address>,
    ) -> AmmResult<(Amount, Amount)> {
        let fee = V2Math::bps_of(amount_in, self.platform_fee_bps)?;
        let referral = match referrer {
            Some(_) => V2Math::bps_of(amount_in, self.referral_fee_bps)?,
            None => Amount::zero(),
        };
        Ok((fee, referral))
    }

    /// Pull the platform fee on `amount_in` from `payer` and return what is
    /// left to trade
    fn take_fee(
        &self,
        host: &mut dyn AssetHost,
        payer: Address,
        asset: &Address,
        amount_in: Amount,
        referrer: Option<Address>,
    ) -> AmmResult<Amount> {
        let fee = self.collect_fee(host, payer, asset, amount_in, referrer)?;
        Ok(amount_in - fee)
    }

    /// Pull the platform fee on `amount` from `payer`, returning the fee
    fn collect_fee(
        &self,
        host: &mut dyn AssetHost,
        payer: Address,
        asset: &Address,
        amount: Amount,
        referrer: Option<Address>,
    ) -> AmmResult<Amount> {
        let (fee, referral) = self.platform_fee(amount, referrer)?;
        if let Some(referrer) = referrer {
            if !referral.is_zero() {
                transfers::transfer_from(host, asset, self.address, payer, referrer, referral)?;
            }
        }
        transfers::transfer_from(host, asset, self.address, payer, self.treasury, fee - referral)?;
        debug!(%payer, %asset, %fee, %referral, "platform fee collected");
        Ok(fee)
    }

    fn only_owner(&self, caller: &Address) -> AmmResult<()> {
        if *caller == self.owner {
            Ok(())
        } else {
            Err(AmmError::Forbidden)
        }
    }

    pub fn set_treasury(&mut self, caller: Address, treasury: Address) -> AmmResult<()> {
        self.only_owner(&caller)?;
        if treasury.is_zero() {
            return Err(AmmError::ZeroAddress);
        }
        self.treasury = treasury;
        info!(%treasury, "treasury changed");
        Ok(())
    }

    /// Must stay above the referral fee and below 100%
    pub fn set_platform_fee(&mut self, caller: Address, fee_bps: u32) -> AmmResult<()> {
        self.only_owner(&caller)?;
        validate_fees(fee_bps, self.referral_fee_bps)?;
        self.platform_fee_bps = fee_bps;
        info!(fee_bps, "platform fee changed");
        Ok(())
    }

    /// Must stay below the platform fee
    pub fn set_referral_fee(&mut self, caller: Address, fee_bps: u32) -> AmmResult<()> {
        self.only_owner(&caller)?;
        validate_fees(self.platform_fee_bps, fee_bps)?;
        self.referral_fee_bps = fee_bps;
        info!(fee_bps, "referral fee changed");
        Ok(())
    }

    pub fn pause(&mut self, caller: Address) -> AmmResult<()> {
        self.only_owner(&caller)?;
        self.paused = true;
        info!(router = %self.address, "router paused");
        Ok(())
    }

    pub fn unpause(&mut self, caller: Address) -> AmmResult<()> {
        self.only_owner(&caller)?;
        self.paused = false;
        info!(router = %self.address, "router unpaused");
        Ok(())
    }

    pub fn blacklist(&mut self, caller: Address, account: Address) -> AmmResult<()> {
        self.only_owner(&caller)?;
        self.blacklist.insert(account);
        info!(%account, "account blacklisted");
        Ok(())
    }

    pub fn unblacklist(&mut self, caller: Address, account: Address) -> AmmResult<()> {
        self.only_owner(&caller)?;
        self.blacklist.remove(&account);
        info!(%account, "account removed from blacklist");
        Ok(())
    }

    /// Sweep the router's own balance of `asset` to the owner
    pub fn recover_lost_tokens(
        &self,
        host: &mut dyn AssetHost,
        caller: Address,
        asset: Address,
    ) -> AmmResult<Amount> {
        self.only_owner(&caller)?;
        let balance = host.balance_of(&asset, &self.address)?;
        transfers::transfer(host, &asset, self.address, self.owner, balance)?;
        info!(%asset, %balance, "recovered router balance");
        Ok(balance)
    }
}

fn validate_fees(platform_bps: u32, referral_bps: u32) -> AmmResult<()> {
    if referral_bps < platform_bps && u64::from(platform_bps) < BASIS_POINTS {
        Ok(())
    } else {
        Err(AmmError::InvalidFee {
            platform_bps,
            referral_bps,
        })
    }
}
