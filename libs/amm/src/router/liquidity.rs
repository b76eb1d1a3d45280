//! Liquidity provision and removal

use super::{Context, Router};
use crate::error::{AmmError, AmmResult};
use crate::library;
use crate::pool_traits::PairFactory;
use crate::transfers;
use crate::v2_math::V2Math;
use serde::{Deserialize, Serialize};
use tracing::debug;
use types::{Address, Amount};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidity {
    pub token_a: Address,
    pub token_b: Address,
    pub amount_a_desired: Amount,
    pub amount_b_desired: Amount,
    pub amount_a_min: Amount,
    pub amount_b_min: Amount,
    /// Receiver of the liquidity tokens
    pub to: Address,
    pub deadline: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityAdded {
    pub amount_a: Amount,
    pub amount_b: Amount,
    pub liquidity: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLiquidity {
    pub token_a: Address,
    pub token_b: Address,
    pub liquidity: Amount,
    pub amount_a_min: Amount,
    pub amount_b_min: Amount,
    /// Receiver of both assets
    pub to: Address,
    pub deadline: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityRemoved {
    pub amount_a: Amount,
    pub amount_b: Amount,
}

impl Router {
    /// Deposit both assets at the pool's current ratio and mint liquidity
    ///
    /// Creates the pair if it does not exist yet; the first deposit sets the price.
    pub(crate) fn add_liquidity(
        &self,
        ctx: &mut Context<'_>,
        caller: Address,
        params: &AddLiquidity,
    ) -> AmmResult<LiquidityAdded> {
        self.guard(&*ctx.host, &caller, params.deadline)?;

        if ctx.factory.get_pair(&params.token_a, &params.token_b).is_none() {
            ctx.factory
                .create_pair(&mut *ctx.host, params.token_a, params.token_b)?;
        }
        let (amount_a, amount_b) = optimal_amounts(ctx, params)?;

        let pair = library::pair_for(&*ctx.factory, &params.token_a, &params.token_b)?;
        transfers::transfer_from(
            &mut *ctx.host,
            &params.token_a,
            self.address,
            caller,
            pair,
            amount_a,
        )?;
        transfers::transfer_from(
            &mut *ctx.host,
            &params.token_b,
            self.address,
            caller,
            pair,
            amount_b,
        )?;

        let fee_to = ctx.factory.fee_to();
        let liquidity = library::handle_mut(&mut *ctx.factory, &pair)?
            .mint(&mut *ctx.host, params.to, fee_to)?;

        debug!(%caller, %pair, %amount_a, %amount_b, %liquidity, "liquidity added");
        Ok(LiquidityAdded {
            amount_a,
            amount_b,
            liquidity,
        })
    }

    /// Return liquidity tokens to the pair and withdraw both assets
    pub(crate) fn remove_liquidity(
        &self,
        ctx: &mut Context<'_>,
        caller: Address,
        params: &RemoveLiquidity,
    ) -> AmmResult<LiquidityRemoved> {
        self.guard(&*ctx.host, &caller, params.deadline)?;

        let pair = library::pair_for(&*ctx.factory, &params.token_a, &params.token_b)?;
        let lp_token = library::handle(&*ctx.factory, &pair)?.lp_token();
        transfers::transfer_from(
            &mut *ctx.host,
            &lp_token,
            self.address,
            caller,
            pair,
            params.liquidity,
        )?;

        let fee_to = ctx.factory.fee_to();
        let (amount0, amount1) = library::handle_mut(&mut *ctx.factory, &pair)?
            .burn(&mut *ctx.host, params.to, fee_to)?;

        let (token0, _) = library::sort_assets(params.token_a, params.token_b)?;
        let (amount_a, amount_b) = if params.token_a == token0 {
            (amount0, amount1)
        } else {
            (amount1, amount0)
        };
        if amount_a < params.amount_a_min {
            return Err(AmmError::InsufficientAAmount);
        }
        if amount_b < params.amount_b_min {
            return Err(AmmError::InsufficientBAmount);
        }

        debug!(%caller, %pair, %amount_a, %amount_b, "liquidity removed");
        Ok(LiquidityRemoved { amount_a, amount_b })
    }
}

/// Largest deposit within the desired amounts that matches the pool ratio
fn optimal_amounts(ctx: &Context<'_>, params: &AddLiquidity) -> AmmResult<(Amount, Amount)> {
    let (reserve_a, reserve_b) =
        library::get_reserves(&*ctx.factory, &params.token_a, &params.token_b)?;
    if reserve_a.is_zero() && reserve_b.is_zero() {
        return Ok((params.amount_a_desired, params.amount_b_desired));
    }

    let amount_b_optimal = V2Math::quote(params.amount_a_desired, reserve_a, reserve_b)?;
    if amount_b_optimal <= params.amount_b_desired {
        if amount_b_optimal < params.amount_b_min {
            return Err(AmmError::InsufficientBAmount);
        }
        return Ok((params.amount_a_desired, amount_b_optimal));
    }

    let amount_a_optimal = V2Math::quote(params.amount_b_desired, reserve_b, reserve_a)?;
    if amount_a_optimal > params.amount_a_desired {
        return Err(AmmError::InsufficientAAmount);
    }
    if amount_a_optimal < params.amount_a_min {
        return Err(AmmError::InsufficientAAmount);
    }
    Ok((amount_a_optimal, params.amount_b_desired))
}
