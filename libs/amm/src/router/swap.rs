//! Swap entry points and hop execution

use super::{Context, Router};
use crate::error::{AmmError, AmmResult};
use crate::library;
use crate::transfers;
use crate::v2_math::V2Math;
use serde::{Deserialize, Serialize};
use tracing::debug;
use types::{Address, Amount};

/// Trade an exact input for as much output as the path yields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExactInput {
    /// Gross input; the platform fee is deducted from it
    pub amount_in: Amount,
    pub amount_out_min: Amount,
    pub path: Vec<Address>,
    pub to: Address,
    pub deadline: u64,
    #[serde(default)]
    pub referrer: Option<Address>,
}

/// Trade as little input as needed for an exact output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExactOutput {
    pub amount_out: Amount,
    /// Ceiling on pair input plus platform fee
    pub amount_in_max: Amount,
    pub path: Vec<Address>,
    pub to: Address,
    pub deadline: u64,
    #[serde(default)]
    pub referrer: Option<Address>,
}

impl Router {
    /// Returns the amount at every node of the path, starting with the net
    /// input after the platform fee
    pub(crate) fn swap_exact_tokens_for_tokens(
        &self,
        ctx: &mut Context<'_>,
        caller: Address,
        params: &ExactInput,
    ) -> AmmResult<Vec<Amount>> {
        self.guard(&*ctx.host, &caller, params.deadline)?;
        let (first, second) = endpoints(&params.path)?;

        let amount_in =
            self.take_fee(&mut *ctx.host, caller, &first, params.amount_in, params.referrer)?;
        let amounts = library::get_amounts_out(&*ctx.factory, amount_in, &params.path)?;
        let amount_out = amounts.last().copied().unwrap_or_default();
        if amount_out < params.amount_out_min {
            return Err(AmmError::InsufficientOutputAmount);
        }

        let first_pair = library::pair_for(&*ctx.factory, &first, &second)?;
        transfers::transfer_from(
            &mut *ctx.host,
            &first,
            self.address,
            caller,
            first_pair,
            amounts[0],
        )?;
        execute_hops(ctx, &amounts, &params.path, params.to)?;

        debug!(%caller, hops = params.path.len() - 1, %amount_in, %amount_out, "exact input swap");
        Ok(amounts)
    }

    /// Returns the amount at every node of the path; the platform fee is
    /// charged on top of the first entry
    pub(crate) fn swap_tokens_for_exact_tokens(
        &self,
        ctx: &mut Context<'_>,
        caller: Address,
        params: &ExactOutput,
    ) -> AmmResult<Vec<Amount>> {
        self.guard(&*ctx.host, &caller, params.deadline)?;
        let (first, second) = endpoints(&params.path)?;

        let amounts = library::get_amounts_in(&*ctx.factory, params.amount_out, &params.path)?;
        let (fee, _) = self.platform_fee(amounts[0], params.referrer)?;
        let total = amounts[0].checked_add(fee).ok_or(AmmError::Overflow)?;
        if total > params.amount_in_max {
            return Err(AmmError::ExcessiveInputAmount);
        }
        self.collect_fee(&mut *ctx.host, caller, &first, amounts[0], params.referrer)?;

        let first_pair = library::pair_for(&*ctx.factory, &first, &second)?;
        transfers::transfer_from(
            &mut *ctx.host,
            &first,
            self.address,
            caller,
            first_pair,
            amounts[0],
        )?;
        execute_hops(ctx, &amounts, &params.path, params.to)?;

        debug!(%caller, hops = params.path.len() - 1, amount_in = %amounts[0], %fee, "exact output swap");
        Ok(amounts)
    }

    /// Exact-input swap for assets whose transfers deliver less than the
    /// nominal amount. Each hop trades whatever actually reached the pair.
    /// Returns the amount credited to `to`.
    pub(crate) fn swap_exact_tokens_for_tokens_supporting_fee_on_transfer_tokens(
        &self,
        ctx: &mut Context<'_>,
        caller: Address,
        params: &ExactInput,
    ) -> AmmResult<Amount> {
        self.guard(&*ctx.host, &caller, params.deadline)?;
        let (first, second) = endpoints(&params.path)?;
        let last = params.path[params.path.len() - 1];

        let amount_in =
            self.take_fee(&mut *ctx.host, caller, &first, params.amount_in, params.referrer)?;
        let first_pair = library::pair_for(&*ctx.factory, &first, &second)?;
        transfers::transfer_from(
            &mut *ctx.host,
            &first,
            self.address,
            caller,
            first_pair,
            amount_in,
        )?;

        let balance_before = ctx.host.balance_of(&last, &params.to)?;
        execute_hops_measured(ctx, &params.path, params.to)?;
        let received = ctx
            .host
            .balance_of(&last, &params.to)?
            .saturating_sub(balance_before);
        if received < params.amount_out_min {
            return Err(AmmError::InsufficientOutputAmount);
        }

        debug!(%caller, hops = params.path.len() - 1, %amount_in, %received, "fee-on-transfer swap");
        Ok(received)
    }
}

fn endpoints(path: &[Address]) -> AmmResult<(Address, Address)> {
    match path {
        [first, second, ..] => Ok((*first, *second)),
        _ => Err(AmmError::InvalidPath),
    }
}

/// Where a hop sends its output: the next pair, or `to` after the last hop
fn hop_recipient(ctx: &Context<'_>, path: &[Address], hop: usize, to: Address) -> AmmResult<Address> {
    match path.get(hop + 2) {
        Some(next) => library::pair_for(&*ctx.factory, &path[hop + 1], next),
        None => Ok(to),
    }
}

fn swap_on_pair(
    ctx: &mut Context<'_>,
    input: &Address,
    output: &Address,
    amount_out: Amount,
    recipient: Address,
) -> AmmResult<()> {
    let (token0, _) = library::sort_assets(*input, *output)?;
    let (amount0_out, amount1_out) = if *input == token0 {
        (Amount::zero(), amount_out)
    } else {
        (amount_out, Amount::zero())
    };
    let pair = library::pair_for(&*ctx.factory, input, output)?;
    library::handle_mut(&mut *ctx.factory, &pair)?.swap(
        &mut *ctx.host,
        amount0_out,
        amount1_out,
        recipient,
    )
}

/// Run every hop with precomputed amounts; the first pair is already funded
fn execute_hops(
    ctx: &mut Context<'_>,
    amounts: &[Amount],
    path: &[Address],
    to: Address,
) -> AmmResult<()> {
    for (hop, assets) in path.windows(2).enumerate() {
        let recipient = hop_recipient(ctx, path, hop, to)?;
        swap_on_pair(ctx, &assets[0], &assets[1], amounts[hop + 1], recipient)?;
    }
    Ok(())
}

/// Run every hop on the input the pair actually received
fn execute_hops_measured(ctx: &mut Context<'_>, path: &[Address], to: Address) -> AmmResult<()> {
    for (hop, assets) in path.windows(2).enumerate() {
        let (input, output) = (assets[0], assets[1]);
        let pair = library::pair_for(&*ctx.factory, &input, &output)?;
        let (reserve_in, reserve_out) = library::get_reserves(&*ctx.factory, &input, &output)?;
        let amount_in = ctx
            .host
            .balance_of(&input, &pair)?
            .checked_sub(reserve_in)
            .ok_or(AmmError::InsufficientInputAmount)?;
        let amount_out = V2Math::get_amount_out(amount_in, reserve_in, reserve_out)?;

        let recipient = hop_recipient(ctx, path, hop, to)?;
        swap_on_pair(ctx, &input, &output, amount_out, recipient)?;
    }
    Ok(())
}
