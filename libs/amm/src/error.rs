//! Error types for the exchange core
//!
//! Every failure is fatal to the call that raised it. Nothing here is retried.

use ledger::LedgerError;
use thiserror::Error;
use types::{Address, Amount};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmmError {
    /// A pair operation was entered while another one was in progress
    #[error("pair is locked")]
    Locked,

    #[error("caller is not authorized")]
    Forbidden,

    #[error("identical assets")]
    IdenticalAddresses,

    #[error("zero address")]
    ZeroAddress,

    #[error("pair already exists")]
    PairExists,

    #[error("no pair registered for {0} / {1}")]
    PairNotFound(Address, Address),

    #[error("{0} is not a registered pair")]
    UnknownPair(Address),

    #[error("path must name at least two assets")]
    InvalidPath,

    #[error("output recipient cannot be one of the pair's assets")]
    InvalidTo,

    #[error("insufficient amount")]
    InsufficientAmount,

    #[error("insufficient amount of asset A")]
    InsufficientAAmount,

    #[error("insufficient amount of asset B")]
    InsufficientBAmount,

    #[error("insufficient input amount")]
    InsufficientInputAmount,

    #[error("insufficient output amount")]
    InsufficientOutputAmount,

    #[error("excessive input amount")]
    ExcessiveInputAmount,

    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    #[error("insufficient liquidity minted")]
    InsufficientLiquidityMinted,

    #[error("insufficient liquidity burned")]
    InsufficientLiquidityBurned,

    /// Post-swap constant-product check failed
    #[error("K")]
    K,

    /// Reserve above the 112-bit ceiling or an intermediate product overflowed
    #[error("overflow")]
    Overflow,

    #[error("transfer of {asset} failed")]
    TransferFailed { asset: Address },

    #[error("deadline {deadline} has passed (now {now})")]
    Expired { deadline: u64, now: u64 },

    #[error("router is paused")]
    Paused,

    #[error("{0} is blacklisted")]
    Blacklisted(Address),

    #[error("invalid fee: platform {platform_bps} bps, referral {referral_bps} bps")]
    InvalidFee { platform_bps: u32, referral_bps: u32 },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

pub type AmmResult<T> = Result<T, AmmError>;

/// Checked multiplication, overflow maps to [`AmmError::Overflow`]
pub(crate) fn mul(a: Amount, b: Amount) -> AmmResult<Amount> {
    a.checked_mul(b).ok_or(AmmError::Overflow)
}

pub(crate) fn add(a: Amount, b: Amount) -> AmmResult<Amount> {
    a.checked_add(b).ok_or(AmmError::Overflow)
}
