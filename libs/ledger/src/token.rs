//! Plain balance-and-allowance token

use crate::FungibleAsset;
use std::collections::BTreeMap;
use types::{Address, Amount};

/// Standard fungible token with an optional single minter
///
/// Without a minter the supply is fixed at whatever the genesis allocations
/// ([`StandardToken::with_balance`]) created. An allowance of `Amount::MAX` is
/// treated as unlimited and never decremented.
#[derive(Debug, Clone)]
pub struct StandardToken {
    symbol: String,
    decimals: u8,
    total_supply: Amount,
    balances: BTreeMap<Address, Amount>,
    allowances: BTreeMap<(Address, Address), Amount>,
    minter: Option<Address>,
}

impl StandardToken {
    pub fn new(symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            symbol: symbol.into(),
            decimals,
            total_supply: Amount::zero(),
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
            minter: None,
        }
    }

    pub fn with_minter(mut self, minter: Address) -> Self {
        self.minter = Some(minter);
        self
    }

    /// Genesis allocation; saturates rather than wrapping the supply
    pub fn with_balance(mut self, owner: Address, amount: Amount) -> Self {
        let balance = self.balances.entry(owner).or_default();
        *balance = balance.saturating_add(amount);
        self.total_supply = self.total_supply.saturating_add(amount);
        self
    }

    pub fn minter(&self) -> Option<Address> {
        self.minter
    }

    /// Whether `move_balance` would succeed, without changing anything
    pub(crate) fn can_move(&self, from: &Address, to: &Address, amount: Amount) -> bool {
        if amount.is_zero() {
            return true;
        }
        self.balance_of(from) >= amount
            && (from == to || self.balance_of(to).checked_add(amount).is_some())
    }

    pub(crate) fn move_balance(&mut self, from: Address, to: Address, amount: Amount) -> bool {
        if !self.can_move(&from, &to, amount) {
            return false;
        }
        if amount.is_zero() || from == to {
            return true;
        }

        let from_balance = self.balance_of(&from);
        self.balances.insert(from, from_balance - amount);
        let to_balance = self.balance_of(&to);
        self.balances.insert(to, to_balance + amount);
        true
    }

    /// Whether `spender` may move `amount` of `from`'s balance
    pub(crate) fn can_spend(&self, spender: &Address, from: &Address, amount: Amount) -> bool {
        spender == from || self.allowance(from, spender) >= amount
    }

    /// Consume `spender`'s allowance over `from`; does not move funds
    pub(crate) fn spend_allowance(&mut self, spender: Address, from: Address, amount: Amount) -> bool {
        if !self.can_spend(&spender, &from, amount) {
            return false;
        }
        if spender == from {
            return true;
        }
        let allowed = self.allowance(&from, &spender);
        if allowed != Amount::MAX {
            self.allowances.insert((from, spender), allowed - amount);
        }
        true
    }

    fn is_minter(&self, caller: &Address) -> bool {
        self.minter.as_ref() == Some(caller)
    }
}

impl FungibleAsset for StandardToken {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn decimals(&self) -> u8 {
        self.decimals
    }

    fn total_supply(&self) -> Amount {
        self.total_supply
    }

    fn balance_of(&self, owner: &Address) -> Amount {
        self.balances.get(owner).copied().unwrap_or_default()
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or_default()
    }

    fn approve(&mut self, owner: Address, spender: Address, amount: Amount) -> bool {
        self.allowances.insert((owner, spender), amount);
        true
    }

    fn transfer(&mut self, from: Address, to: Address, amount: Amount) -> bool {
        self.move_balance(from, to, amount)
    }

    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> bool {
        if !self.can_spend(&spender, &from, amount) || !self.can_move(&from, &to, amount) {
            return false;
        }
        self.spend_allowance(spender, from, amount) && self.move_balance(from, to, amount)
    }

    fn mint(&mut self, minter: Address, to: Address, amount: Amount) -> bool {
        if !self.is_minter(&minter) {
            return false;
        }
        let Some(supply) = self.total_supply.checked_add(amount) else {
            return false;
        };
        let balance = self.balance_of(&to);
        self.total_supply = supply;
        self.balances.insert(to, balance + amount);
        true
    }

    fn burn(&mut self, minter: Address, from: Address, amount: Amount) -> bool {
        if !self.is_minter(&minter) {
            return false;
        }
        let balance = self.balance_of(&from);
        if balance < amount {
            return false;
        }
        self.balances.insert(from, balance - amount);
        self.total_supply -= amount;
        true
    }

    fn box_clone(&self) -> Box<dyn FungibleAsset> {
        Box::new(self.clone())
    }
}
