//! # Pair Engine
//!
//! One constant-product pool over two assets. The pair records reserves, the
//! TWAP price accumulators and `k_last` for the protocol fee; the balances
//! themselves live in the host ledger. Callers deposit first and then call
//! `mint` or `swap`, which infer the deposit by diffing balances against the
//! recorded reserves. Those mutators are crate-private: they change the host in
//! place, so outside callers reach them through [`crate::Exchange`].
//!
//! Every mutating operation holds the pair's [`ReentrancyLock`] for its whole
//! duration.

use crate::error::{add, mul, AmmError, AmmResult};
use crate::lock::ReentrancyLock;
use crate::pool_traits::PairHandle;
use crate::transfers;
use crate::v2_math::{V2Math, MAX_UINT112, MINIMUM_LIQUIDITY};
use ledger::{AssetHost, StandardToken};
use serde::{Deserialize, Serialize};
use tracing::debug;
use types::{Address, Amount};

/// Permanent holder of the first mint's locked liquidity
pub const BURN_SINK: Address = Address::ZERO;

/// Decimals of every liquidity token
pub const LP_DECIMALS: u8 = 18;

const LP_SYMBOL: &str = "AMM-LP";

/// Recorded reserves and the time they were last written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reserves {
    pub reserve0: Amount,
    pub reserve1: Amount,
    /// Block time modulo 2^32
    pub block_timestamp_last: u32,
}

/// Liquidity token identifier for a pair
pub fn lp_token_address(pair: &Address) -> Address {
    Address::derive(b"lp", &[pair])
}

#[derive(Debug, Clone)]
pub struct Pair {
    lock: ReentrancyLock,
    core: PairCore,
}

#[derive(Debug, Clone)]
struct PairCore {
    address: Address,
    factory: Address,
    token0: Address,
    token1: Address,
    lp_token: Address,
    initialized: bool,
    reserve0: Amount,
    reserve1: Amount,
    block_timestamp_last: u32,
    price0_cumulative_last: Amount,
    price1_cumulative_last: Amount,
    k_last: Amount,
}

impl Pair {
    /// Pair at `address`, created by `factory`; unusable until initialized
    pub fn new(address: Address, factory: Address) -> Self {
        Self {
            lock: ReentrancyLock::new(),
            core: PairCore {
                address,
                factory,
                token0: Address::ZERO,
                token1: Address::ZERO,
                lp_token: lp_token_address(&address),
                initialized: false,
                reserve0: Amount::zero(),
                reserve1: Amount::zero(),
                block_timestamp_last: 0,
                price0_cumulative_last: Amount::zero(),
                price1_cumulative_last: Amount::zero(),
                k_last: Amount::zero(),
            },
        }
    }

    /// Bind the pair to its assets and deploy its liquidity token
    ///
    /// Callable once, by the factory only.
    pub(crate) fn initialize(
        &mut self,
        host: &mut dyn AssetHost,
        caller: Address,
        token0: Address,
        token1: Address,
    ) -> AmmResult<()> {
        let core = &mut self.core;
        if caller != core.factory || core.initialized {
            return Err(AmmError::Forbidden);
        }
        let lp = StandardToken::new(LP_SYMBOL, LP_DECIMALS).with_minter(core.address);
        host.deploy(core.lp_token, Box::new(lp))?;

        core.token0 = token0;
        core.token1 = token1;
        core.initialized = true;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.core.initialized
    }

    pub fn price0_cumulative_last(&self) -> Amount {
        self.core.price0_cumulative_last
    }

    pub fn price1_cumulative_last(&self) -> Amount {
        self.core.price1_cumulative_last
    }

    pub fn k_last(&self) -> Amount {
        self.core.k_last
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    /// Reentrancy lock guarding this pair
    pub fn lock(&self) -> &ReentrancyLock {
        &self.lock
    }

    /// Mint liquidity for whatever was deposited since the last update
    pub(crate) fn mint(
        &mut self,
        host: &mut dyn AssetHost,
        to: Address,
        fee_to: Option<Address>,
    ) -> AmmResult<Amount> {
        let _guard = self.lock.enter()?;
        self.core.mint(host, to, fee_to)
    }

    /// Burn the liquidity tokens held by the pair, paying out both assets to `to`
    pub(crate) fn burn(
        &mut self,
        host: &mut dyn AssetHost,
        to: Address,
        fee_to: Option<Address>,
    ) -> AmmResult<(Amount, Amount)> {
        let _guard = self.lock.enter()?;
        self.core.burn(host, to, fee_to)
    }

    pub(crate) fn swap(
        &mut self,
        host: &mut dyn AssetHost,
        amount0_out: Amount,
        amount1_out: Amount,
        to: Address,
    ) -> AmmResult<()> {
        let _guard = self.lock.enter()?;
        self.core.swap(host, amount0_out, amount1_out, to)
    }

    /// Send balances in excess of the reserves to `to`
    pub(crate) fn skim(&mut self, host: &mut dyn AssetHost, to: Address) -> AmmResult<()> {
        let _guard = self.lock.enter()?;
        self.core.skim(host, to)
    }

    /// Force reserves to match balances
    pub(crate) fn sync(&mut self, host: &mut dyn AssetHost) -> AmmResult<()> {
        let _guard = self.lock.enter()?;
        self.core.sync(host)
    }
}

impl PairHandle for Pair {
    fn address(&self) -> Address {
        self.core.address
    }

    fn factory(&self) -> Address {
        self.core.factory
    }

    fn token0(&self) -> Address {
        self.core.token0
    }

    fn token1(&self) -> Address {
        self.core.token1
    }

    fn lp_token(&self) -> Address {
        self.core.lp_token
    }

    fn reserves(&self) -> Reserves {
        Reserves {
            reserve0: self.core.reserve0,
            reserve1: self.core.reserve1,
            block_timestamp_last: self.core.block_timestamp_last,
        }
    }
}

impl PairCore {
    fn ensure_initialized(&self) -> AmmResult<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(AmmError::Forbidden)
        }
    }

    fn balances(&self, host: &dyn AssetHost) -> AmmResult<(Amount, Amount)> {
        Ok((
            host.balance_of(&self.token0, &self.address)?,
            host.balance_of(&self.token1, &self.address)?,
        ))
    }

    fn mint(
        &mut self,
        host: &mut dyn AssetHost,
        to: Address,
        fee_to: Option<Address>,
    ) -> AmmResult<Amount> {
        self.ensure_initialized()?;
        let (reserve0, reserve1) = (self.reserve0, self.reserve1);
        let (balance0, balance1) = self.balances(host)?;
        let amount0 = balance0.saturating_sub(reserve0);
        let amount1 = balance1.saturating_sub(reserve1);

        // may mint to the fee recipient, so it runs before supply is read
        let fee_on = self.mint_fee(host, reserve0, reserve1, fee_to)?;
        let total_supply = host.total_supply(&self.lp_token)?;

        let liquidity = if total_supply.is_zero() {
            let minimum = Amount::from(MINIMUM_LIQUIDITY);
            let root = V2Math::sqrt(mul(amount0, amount1)?);
            if root <= minimum {
                return Err(AmmError::InsufficientLiquidityMinted);
            }
            transfers::mint(host, &self.lp_token, self.address, BURN_SINK, minimum)?;
            root - minimum
        } else {
            let share0 = mul(amount0, total_supply)?
                .checked_div(reserve0)
                .ok_or(AmmError::InsufficientLiquidityMinted)?;
            let share1 = mul(amount1, total_supply)?
                .checked_div(reserve1)
                .ok_or(AmmError::InsufficientLiquidityMinted)?;
            share0.min(share1)
        };
        if liquidity.is_zero() {
            return Err(AmmError::InsufficientLiquidityMinted);
        }

        transfers::mint(host, &self.lp_token, self.address, to, liquidity)?;
        self.update(balance0, balance1, reserve0, reserve1, host.timestamp())?;
        if fee_on {
            self.k_last = mul(self.reserve0, self.reserve1)?;
        }

        debug!(
            pair = %self.address,
            %to,
            %amount0,
            %amount1,
            %liquidity,
            "minted liquidity"
        );
        Ok(liquidity)
    }

    fn burn(
        &mut self,
        host: &mut dyn AssetHost,
        to: Address,
        fee_to: Option<Address>,
    ) -> AmmResult<(Amount, Amount)> {
        self.ensure_initialized()?;
        let (reserve0, reserve1) = (self.reserve0, self.reserve1);
        let (balance0, balance1) = self.balances(host)?;
        let liquidity = host.balance_of(&self.lp_token, &self.address)?;

        let fee_on = self.mint_fee(host, reserve0, reserve1, fee_to)?;
        let total_supply = host.total_supply(&self.lp_token)?;
        if total_supply.is_zero() {
            return Err(AmmError::InsufficientLiquidityBurned);
        }

        // pro-rata on balances, not reserves
        let amount0 = mul(liquidity, balance0)? / total_supply;
        let amount1 = mul(liquidity, balance1)? / total_supply;
        if amount0.is_zero() || amount1.is_zero() {
            return Err(AmmError::InsufficientLiquidityBurned);
        }

        transfers::burn(host, &self.lp_token, self.address, self.address, liquidity)?;
        transfers::transfer(host, &self.token0, self.address, to, amount0)?;
        transfers::transfer(host, &self.token1, self.address, to, amount1)?;

        let (balance0, balance1) = self.balances(host)?;
        self.update(balance0, balance1, reserve0, reserve1, host.timestamp())?;
        if fee_on {
            self.k_last = mul(self.reserve0, self.reserve1)?;
        }

        debug!(
            pair = %self.address,
            %to,
            %liquidity,
            %amount0,
            %amount1,
            "burned liquidity"
        );
        Ok((amount0, amount1))
    }

    fn swap(
        &mut self,
        host: &mut dyn AssetHost,
        amount0_out: Amount,
        amount1_out: Amount,
        to: Address,
    ) -> AmmResult<()> {
        self.ensure_initialized()?;
        if to == self.token0 || to == self.token1 {
            return Err(AmmError::InvalidTo);
        }
        if amount0_out.is_zero() && amount1_out.is_zero() {
            return Err(AmmError::InsufficientOutputAmount);
        }
        let (reserve0, reserve1) = (self.reserve0, self.reserve1);
        if amount0_out >= reserve0 || amount1_out >= reserve1 {
            return Err(AmmError::InsufficientLiquidity);
        }

        // optimistic transfer, then infer what was paid in
        if !amount0_out.is_zero() {
            transfers::transfer(host, &self.token0, self.address, to, amount0_out)?;
        }
        if !amount1_out.is_zero() {
            transfers::transfer(host, &self.token1, self.address, to, amount1_out)?;
        }
        let (balance0, balance1) = self.balances(host)?;

        let amount0_in = balance0.saturating_sub(reserve0 - amount0_out);
        let amount1_in = balance1.saturating_sub(reserve1 - amount1_out);
        if amount0_in.is_zero() && amount1_in.is_zero() {
            return Err(AmmError::InsufficientInputAmount);
        }

        let thousand = Amount::from(1_000u64);
        let three = Amount::from(3u64);
        let adjusted0 = mul(balance0, thousand)? - mul(amount0_in, three)?;
        let adjusted1 = mul(balance1, thousand)? - mul(amount1_in, three)?;
        let k_after = mul(adjusted0, adjusted1)?;
        let k_before = mul(mul(reserve0, reserve1)?, Amount::from(1_000_000u64))?;
        if k_after < k_before {
            return Err(AmmError::K);
        }

        self.update(balance0, balance1, reserve0, reserve1, host.timestamp())?;

        debug!(
            pair = %self.address,
            %to,
            %amount0_in,
            %amount1_in,
            %amount0_out,
            %amount1_out,
            "swap"
        );
        Ok(())
    }

    fn skim(&mut self, host: &mut dyn AssetHost, to: Address) -> AmmResult<()> {
        self.ensure_initialized()?;
        let (balance0, balance1) = self.balances(host)?;
        let excess0 = balance0.saturating_sub(self.reserve0);
        let excess1 = balance1.saturating_sub(self.reserve1);
        transfers::transfer(host, &self.token0, self.address, to, excess0)?;
        transfers::transfer(host, &self.token1, self.address, to, excess1)?;
        debug!(pair = %self.address, %to, %excess0, %excess1, "skim");
        Ok(())
    }

    fn sync(&mut self, host: &mut dyn AssetHost) -> AmmResult<()> {
        self.ensure_initialized()?;
        let (balance0, balance1) = self.balances(host)?;
        let (reserve0, reserve1) = (self.reserve0, self.reserve1);
        self.update(balance0, balance1, reserve0, reserve1, host.timestamp())
    }

    /// Record new reserves and advance the price accumulators
    fn update(
        &mut self,
        balance0: Amount,
        balance1: Amount,
        reserve0: Amount,
        reserve1: Amount,
        now: u64,
    ) -> AmmResult<()> {
        if balance0 > MAX_UINT112 || balance1 > MAX_UINT112 {
            return Err(AmmError::Overflow);
        }
        let block_timestamp = (now % (1u64 << 32)) as u32;
        let elapsed = i64::from(block_timestamp) - i64::from(self.block_timestamp_last);
        if elapsed > 0 && !reserve0.is_zero() && !reserve1.is_zero() {
            let elapsed = Amount::from(elapsed as u64);
            // accumulators wrap on overflow
            let price0 = V2Math::uqdiv(V2Math::encode_uq112(reserve1), reserve0);
            let price1 = V2Math::uqdiv(V2Math::encode_uq112(reserve0), reserve1);
            self.price0_cumulative_last = self
                .price0_cumulative_last
                .overflowing_add(price0.overflowing_mul(elapsed).0)
                .0;
            self.price1_cumulative_last = self
                .price1_cumulative_last
                .overflowing_add(price1.overflowing_mul(elapsed).0)
                .0;
        }
        self.reserve0 = balance0;
        self.reserve1 = balance1;
        self.block_timestamp_last = block_timestamp;
        Ok(())
    }

    /// Mint the protocol's share of fee growth: 1/6 of the growth in sqrt(k)
    fn mint_fee(
        &mut self,
        host: &mut dyn AssetHost,
        reserve0: Amount,
        reserve1: Amount,
        fee_to: Option<Address>,
    ) -> AmmResult<bool> {
        let Some(recipient) = fee_to else {
            if !self.k_last.is_zero() {
                self.k_last = Amount::zero();
            }
            return Ok(false);
        };
        if self.k_last.is_zero() {
            return Ok(true);
        }

        let root_k = V2Math::sqrt(mul(reserve0, reserve1)?);
        let root_k_last = V2Math::sqrt(self.k_last);
        if root_k > root_k_last {
            let total_supply = host.total_supply(&self.lp_token)?;
            let numerator = mul(total_supply, root_k - root_k_last)?;
            let denominator = add(mul(root_k, Amount::from(5u64))?, root_k_last)?;
            let liquidity = numerator / denominator;
            if !liquidity.is_zero() {
                transfers::mint(host, &self.lp_token, self.address, recipient, liquidity)?;
                debug!(pair = %self.address, %recipient, %liquidity, "minted protocol fee");
            }
        }
        Ok(true)
    }
}
