//! # AMM Exchange Core - Constant-Product Pair Engine
//!
//! ## Purpose
//!
//! Exact-integer implementation of a constant-product automated market maker:
//! two-asset pairs that enforce `reserve0 * reserve1` non-decreasing across
//! swaps, a factory that registers one pair per asset pair at a deterministic
//! identifier, and a router that quotes and executes multi-hop routes and
//! liquidity operations over those pairs.
//!
//! ## Integration Points
//!
//! - **Host ledger**: every balance lives in an [`ledger::AssetHost`]; pairs and
//!   the router move funds through it and never hold balances themselves
//! - **Configuration**: [`Exchange::from_config`] builds the factory and router
//!   from an [`exchange_config::ExchangeConfig`]
//! - **Seams**: quoting reads pairs and the registry through [`PairHandle`]
//!   and [`PairFactory`]; every state change goes through [`Exchange`]
//!
//! ## Architecture Role
//!
//! ```text
//! caller ──► Exchange (stage, commit on Ok)
//!              │
//!              ├─► Router ──► library quoting ──► PairFactory ──► PairHandle
//!              │      └─ platform fee, deadline, blacklist, pause
//!              └─► Factory ──► Pair (reserves, TWAP, protocol fee, lock)
//! ```
//!
//! ## Arithmetic
//!
//! - **Amounts**: 256-bit unsigned integers; reserves capped at 2^112 - 1
//! - **Rounding**: every division floors; exact-output quotes round the input up
//! - **Overflow**: checked everywhere except the TWAP accumulators, which wrap

pub mod error;
pub mod exchange;
pub mod factory;
pub mod library;
pub mod lock;
pub mod pair;
pub mod pool_traits;
pub mod router;
pub mod v2_math;

mod transfers;

pub use error::{AmmError, AmmResult};
pub use exchange::Exchange;
pub use factory::Factory;
pub use lock::{LockGuard, ReentrancyLock};
pub use pair::{lp_token_address, Pair, Reserves, BURN_SINK};
pub use pool_traits::{PairFactory, PairHandle};
pub use router::{
    AddLiquidity, ExactInput, ExactOutput, LiquidityAdded, LiquidityRemoved, RemoveLiquidity,
    Router,
};
pub use v2_math::{V2Math, BASIS_POINTS, MAX_UINT112, MINIMUM_LIQUIDITY, Q112};
