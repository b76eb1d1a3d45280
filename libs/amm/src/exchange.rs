//! # Transactional Exchange
//!
//! Owns the host ledger, the factory (with its pairs) and the router, and runs
//! every mutating entry point as a transaction: the operation executes against
//! staged copies of all three, which replace the live state only if it
//! returns `Ok`. A failure anywhere, including in the middle of a multi-hop
//! route after some transfers already happened, leaves the exchange exactly as
//! it was.

use crate::error::AmmResult;
use crate::factory::Factory;
use crate::library;
use crate::pair::Pair;
use crate::pool_traits::PairFactory;
use crate::router::{
    AddLiquidity, Context, ExactInput, ExactOutput, LiquidityAdded, LiquidityRemoved,
    RemoveLiquidity, Router,
};
use exchange_config::ExchangeConfig;
use ledger::AssetHost;
use tracing::warn;
use types::{Address, Amount};

#[derive(Debug, Clone)]
pub struct Exchange<H: AssetHost + Clone> {
    host: H,
    factory: Factory,
    router: Router,
}

impl<H: AssetHost + Clone> Exchange<H> {
    pub fn new(host: H, factory: Factory, router: Router) -> Self {
        Self {
            host,
            factory,
            router,
        }
    }

    /// Build the factory and router at the given identifiers from configuration
    pub fn from_config(
        host: H,
        factory_address: Address,
        router_address: Address,
        config: &ExchangeConfig,
    ) -> AmmResult<Self> {
        let factory = Factory::from_settings(factory_address, &config.factory);
        let router = Router::new(router_address, &config.router)?;
        Ok(Self::new(host, factory, router))
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Direct host access, outside any transaction (genesis setup, clock)
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn factory(&self) -> &Factory {
        &self.factory
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn pair(&self, pair: &Address) -> Option<&Pair> {
        self.factory.pair_state(pair)
    }

    pub fn get_pair(&self, token_a: &Address, token_b: &Address) -> Option<Address> {
        self.factory.get_pair(token_a, token_b)
    }

    pub fn get_reserves(&self, token_a: &Address, token_b: &Address) -> AmmResult<(Amount, Amount)> {
        library::get_reserves(&self.factory, token_a, token_b)
    }

    pub fn get_amounts_out(&self, amount_in: Amount, path: &[Address]) -> AmmResult<Vec<Amount>> {
        library::get_amounts_out(&self.factory, amount_in, path)
    }

    pub fn get_amounts_in(&self, amount_out: Amount, path: &[Address]) -> AmmResult<Vec<Amount>> {
        library::get_amounts_in(&self.factory, amount_out, path)
    }

    /// Run `op` on staged state; commit on `Ok`, discard on `Err`
    pub fn transact<T, F>(&mut self, op: F) -> AmmResult<T>
    where
        F: FnOnce(&mut H, &mut Factory, &mut Router) -> AmmResult<T>,
    {
        let mut host = self.host.clone();
        let mut factory = self.factory.clone();
        let mut router = self.router.clone();

        match op(&mut host, &mut factory, &mut router) {
            Ok(value) => {
                self.host = host;
                self.factory = factory;
                self.router = router;
                Ok(value)
            }
            Err(error) => {
                warn!(%error, "transaction rolled back");
                Err(error)
            }
        }
    }

    fn with_router<T, F>(&mut self, op: F) -> AmmResult<T>
    where
        F: FnOnce(&Router, &mut Context<'_>) -> AmmResult<T>,
    {
        self.transact(|host, factory, router| {
            let mut ctx = Context::new(host, factory);
            op(router, &mut ctx)
        })
    }

    fn with_pair<T, F>(&mut self, pair: Address, op: F) -> AmmResult<T>
    where
        F: FnOnce(&mut Pair, &mut H, Option<Address>) -> AmmResult<T>,
    {
        self.transact(|host, factory, _| {
            let fee_to = factory.fee_to();
            let handle = library::handle_mut(factory, &pair)?;
            op(handle, host, fee_to)
        })
    }

    // Factory

    pub fn create_pair(&mut self, token_a: Address, token_b: Address) -> AmmResult<Address> {
        self.transact(|host, factory, _| factory.create_pair(host, token_a, token_b))
    }

    pub fn set_fee_to(&mut self, caller: Address, fee_to: Option<Address>) -> AmmResult<()> {
        self.transact(|_, factory, _| factory.set_fee_to(caller, fee_to))
    }

    pub fn set_fee_to_setter(&mut self, caller: Address, fee_to_setter: Address) -> AmmResult<()> {
        self.transact(|_, factory, _| factory.set_fee_to_setter(caller, fee_to_setter))
    }

    // Pair

    pub fn mint(&mut self, pair: Address, to: Address) -> AmmResult<Amount> {
        self.with_pair(pair, |handle, host, fee_to| handle.mint(host, to, fee_to))
    }

    pub fn burn(&mut self, pair: Address, to: Address) -> AmmResult<(Amount, Amount)> {
        self.with_pair(pair, |handle, host, fee_to| handle.burn(host, to, fee_to))
    }

    pub fn swap(
        &mut self,
        pair: Address,
        amount0_out: Amount,
        amount1_out: Amount,
        to: Address,
    ) -> AmmResult<()> {
        self.with_pair(pair, |handle, host, _| {
            handle.swap(host, amount0_out, amount1_out, to)
        })
    }

    pub fn skim(&mut self, pair: Address, to: Address) -> AmmResult<()> {
        self.with_pair(pair, |handle, host, _| handle.skim(host, to))
    }

    pub fn sync(&mut self, pair: Address) -> AmmResult<()> {
        self.with_pair(pair, |handle, host, _| handle.sync(host))
    }

    // Router

    pub fn add_liquidity(
        &mut self,
        caller: Address,
        params: &AddLiquidity,
    ) -> AmmResult<LiquidityAdded> {
        self.with_router(|router, ctx| router.add_liquidity(ctx, caller, params))
    }

    pub fn remove_liquidity(
        &mut self,
        caller: Address,
        params: &RemoveLiquidity,
    ) -> AmmResult<LiquidityRemoved> {
        self.with_router(|router, ctx| router.remove_liquidity(ctx, caller, params))
    }

    pub fn swap_exact_tokens_for_tokens(
        &mut self,
        caller: Address,
        params: &ExactInput,
    ) -> AmmResult<Vec<Amount>> {
        self.with_router(|router, ctx| router.swap_exact_tokens_for_tokens(ctx, caller, params))
    }

    pub fn swap_tokens_for_exact_tokens(
        &mut self,
        caller: Address,
        params: &ExactOutput,
    ) -> AmmResult<Vec<Amount>> {
        self.with_router(|router, ctx| router.swap_tokens_for_exact_tokens(ctx, caller, params))
    }

    pub fn swap_exact_tokens_for_tokens_supporting_fee_on_transfer_tokens(
        &mut self,
        caller: Address,
        params: &ExactInput,
    ) -> AmmResult<Amount> {
        self.with_router(|router, ctx| {
            router.swap_exact_tokens_for_tokens_supporting_fee_on_transfer_tokens(ctx, caller, params)
        })
    }

    // Router administration

    pub fn set_treasury(&mut self, caller: Address, treasury: Address) -> AmmResult<()> {
        self.transact(|_, _, router| router.set_treasury(caller, treasury))
    }

    pub fn set_platform_fee(&mut self, caller: Address, fee_bps: u32) -> AmmResult<()> {
        self.transact(|_, _, router| router.set_platform_fee(caller, fee_bps))
    }

    pub fn set_referral_fee(&mut self, caller: Address, fee_bps: u32) -> AmmResult<()> {
        self.transact(|_, _, router| router.set_referral_fee(caller, fee_bps))
    }

    pub fn pause(&mut self, caller: Address) -> AmmResult<()> {
        self.transact(|_, _, router| router.pause(caller))
    }

    pub fn unpause(&mut self, caller: Address) -> AmmResult<()> {
        self.transact(|_, _, router| router.unpause(caller))
    }

    pub fn blacklist(&mut self, caller: Address, account: Address) -> AmmResult<()> {
        self.transact(|_, _, router| router.blacklist(caller, account))
    }

    pub fn unblacklist(&mut self, caller: Address, account: Address) -> AmmResult<()> {
        self.transact(|_, _, router| router.unblacklist(caller, account))
    }

    pub fn recover_lost_tokens(&mut self, caller: Address, asset: Address) -> AmmResult<Amount> {
        self.transact(|host, _, router| router.recover_lost_tokens(host, caller, asset))
    }
}
