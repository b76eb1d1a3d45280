//! Token that charges a fee on every transfer
//!
//! The receiver is credited `amount - amount * fee_bps / 10_000`; the difference
//! goes to `fee_sink`. Minting and burning are fee-free. Routes that trade such
//! assets cannot trust nominal amounts and must measure what actually arrived.

use crate::{FungibleAsset, StandardToken};
use types::{Address, Amount};

const BASIS_POINTS: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct FeeOnTransferToken {
    inner: StandardToken,
    fee_bps: u32,
    fee_sink: Address,
}

impl FeeOnTransferToken {
    /// `fee_bps` is capped at 10_000 (the whole transfer)
    pub fn new(inner: StandardToken, fee_bps: u32, fee_sink: Address) -> Self {
        Self {
            inner,
            fee_bps: fee_bps.min(BASIS_POINTS as u32),
            fee_sink,
        }
    }

    pub fn fee_bps(&self) -> u32 {
        self.fee_bps
    }

    pub fn transfer_fee(&self, amount: Amount) -> Amount {
        // amount <= 2^256-1 and fee_bps <= 10^4 can overflow; fall back to divide-first
        match amount.checked_mul(Amount::from(self.fee_bps)) {
            Some(scaled) => scaled / Amount::from(BASIS_POINTS),
            None => amount / Amount::from(BASIS_POINTS) * Amount::from(self.fee_bps),
        }
    }

    /// Whether both legs of a charged transfer would succeed
    fn can_charge(&self, from: &Address, to: &Address, amount: Amount) -> bool {
        if *to == self.fee_sink {
            return self.inner.can_move(from, to, amount);
        }
        let fee = self.transfer_fee(amount);
        self.inner.balance_of(from) >= amount
            && self.inner.can_move(from, &self.fee_sink, fee)
            && self.inner.can_move(from, to, amount - fee)
    }

    fn charge_and_move(&mut self, from: Address, to: Address, amount: Amount) -> bool {
        if !self.can_charge(&from, &to, amount) {
            return false;
        }
        let fee = self.transfer_fee(amount);
        self.inner.move_balance(from, self.fee_sink, fee)
            && self.inner.move_balance(from, to, amount - fee)
    }
}

impl FungibleAsset for FeeOnTransferToken {
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
        self.charge_and_move(from, to, amount)
    }

    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> bool {
        if !self.inner.can_spend(&spender, &from, amount) || !self.can_charge(&from, &to, amount) {
            return false;
        }
        self.inner.spend_allowance(spender, from, amount) && self.charge_and_move(from, to, amount)
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
