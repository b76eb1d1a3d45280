//! Shared fixture for exchange integration tests

#![allow(dead_code)]

use amm::{AddLiquidity, Exchange, LiquidityAdded};
use exchange_config::{ExchangeConfig, FactorySettings, LoggingConfig, RouterSettings};
use ledger::{AssetHost, FeeOnTransferToken, FungibleAsset, Ledger, StandardToken};
use types::{Address, Amount};

pub const GENESIS_BALANCE: u64 = 1_000_000_000_000;
pub const NOW: u64 = 1_700_000_000;
pub const DEADLINE: u64 = NOW + 600;

pub fn amt(value: u64) -> Amount {
    Amount::from(value)
}

pub fn addr(value: u64) -> Address {
    Address::from_low_u64(value)
}

pub struct Accounts {
    pub owner: Address,
    pub treasury: Address,
    pub fee_to_setter: Address,
    pub alice: Address,
    pub bob: Address,
    pub referrer: Address,
}

pub fn accounts() -> Accounts {
    Accounts {
        owner: addr(0x0e),
        treasury: addr(0x7e),
        fee_to_setter: addr(0xfe),
        alice: addr(0xa1),
        bob: addr(0xb0),
        referrer: addr(0x4ef),
    }
}

pub const FACTORY: u64 = 0xfac;
pub const ROUTER: u64 = 0x4047;

pub fn config(accounts: &Accounts) -> ExchangeConfig {
    ExchangeConfig {
        factory: FactorySettings {
            fee_to_setter: accounts.fee_to_setter,
            fee_to: None,
        },
        router: RouterSettings::new(accounts.owner, accounts.treasury),
        logging: LoggingConfig::default(),
    }
}

/// Transfers from `frozen` always fail; everything else behaves normally
#[derive(Debug, Clone)]
pub struct FreezableToken {
    inner: StandardToken,
    frozen: Address,
}

impl FreezableToken {
    pub fn new(inner: StandardToken, frozen: Address) -> Self {
        Self { inner, frozen }
    }
}

impl FungibleAsset for FreezableToken {
    fn symbol(&self) -> &str {
        self.inner.symbol()
    }

    fn decimals(&self) -> u8 {
        self.inner.decimals()
    }

    fn total_supply(&self) -> Amount {
        self.inner.total_supply()
    }

    fn balance_of(&self, owner: &Address) -> Amount {
        self.inner.balance_of(owner)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.inner.allowance(owner, spender)
    }

    fn approve(&mut self, owner: Address, spender: Address, amount: Amount) -> bool {
        self.inner.approve(owner, spender, amount)
    }

    fn transfer(&mut self, from: Address, to: Address, amount: Amount) -> bool {
        from != self.frozen && self.inner.transfer(from, to, amount)
    }

    fn transfer_from(&mut self, spender: Address, from: Address, to: Address, amount: Amount) -> bool {
        from != self.frozen && self.inner.transfer_from(spender, from, to, amount)
    }

    fn mint(&mut self, minter: Address, to: Address, amount: Amount) -> bool {
        self.inner.mint(minter, to, amount)
    }

    fn burn(&mut self, minter: Address, from: Address, amount: Amount) -> bool {
        self.inner.burn(minter, from, amount)
    }

    fn box_clone(&self) -> Box<dyn FungibleAsset> {
        Box::new(self.clone())
    }
}

pub struct Harness {
    pub exchange: Exchange<Ledger>,
    pub accounts: Accounts,
}

impl Harness {
    pub fn new() -> Self {
        let accounts = accounts();
        let exchange = Exchange::from_config(
            Ledger::with_timestamp(NOW),
            addr(FACTORY),
            addr(ROUTER),
            &config(&accounts),
        )
        .expect("valid exchange config");
        Self { exchange, accounts }
    }

    pub fn router(&self) -> Address {
        self.exchange.router().address()
    }

    /// Deploy a standard token funded for alice and bob, approved to the router
    pub fn token(&mut self, id: u64, symbol: &str) -> Address {
        let token = StandardToken::new(symbol, 18)
            .with_balance(self.accounts.alice, amt(GENESIS_BALANCE))
            .with_balance(self.accounts.bob, amt(GENESIS_BALANCE));
        self.deploy(id, Box::new(token))
    }

    /// Token charging `fee_bps` on every transfer, fee paid to `sink`
    pub fn fee_token(&mut self, id: u64, fee_bps: u32, sink: Address) -> Address {
        let inner = StandardToken::new("FOT", 18)
            .with_balance(self.accounts.alice, amt(GENESIS_BALANCE))
            .with_balance(self.accounts.bob, amt(GENESIS_BALANCE));
        self.deploy(id, Box::new(FeeOnTransferToken::new(inner, fee_bps, sink)))
    }

    pub fn deploy(&mut self, id: u64, asset: Box<dyn FungibleAsset>) -> Address {
        let address = addr(id);
        let router = self.router();
        let host = self.exchange.host_mut();
        host.deploy(address, asset).expect("fresh asset id");
        for holder in [self.accounts.alice, self.accounts.bob] {
            host.approve(&address, holder, router, Amount::MAX)
                .expect("asset exists");
        }
        address
    }

    pub fn add_liquidity(
        &mut self,
        token_a: Address,
        token_b: Address,
        amount_a: u64,
        amount_b: u64,
    ) -> LiquidityAdded {
        let params = AddLiquidity {
            token_a,
            token_b,
            amount_a_desired: amt(amount_a),
            amount_b_desired: amt(amount_b),
            amount_a_min: Amount::zero(),
            amount_b_min: Amount::zero(),
            to: self.accounts.alice,
            deadline: DEADLINE,
        };
        let alice = self.accounts.alice;
        self.exchange
            .add_liquidity(alice, &params)
            .expect("liquidity added")
    }

    pub fn balance(&self, asset: &Address, owner: &Address) -> Amount {
        self.exchange
            .host()
            .balance_of(asset, owner)
            .expect("asset exists")
    }

    pub fn reserves(&self, token_a: &Address, token_b: &Address) -> (Amount, Amount) {
        self.exchange
            .get_reserves(token_a, token_b)
            .expect("pair exists")
    }
}
