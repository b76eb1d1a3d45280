//! # Host Ledger - Fungible Asset Collaborator
//!
//! ## Purpose
//!
//! Defines the interface the exchange core uses to hold and move assets, and an
//! in-memory implementation of it. The core never owns balances itself: it reads
//! and moves them through [`AssetHost`], which resolves asset identifiers to
//! [`FungibleAsset`] implementations and supplies the block clock.
//!
//! ## Integration Points
//!
//! - **Consumers**: pair engine (balances, optimistic transfers, liquidity token
//!   mint/burn), router (pulling caller funds into pairs, fee extraction)
//! - **Implementations**: [`StandardToken`] (plain balances and allowances),
//!   [`FeeOnTransferToken`] (receiver gets less than the nominal amount)
//! - **Host**: [`Ledger`] keeps every deployed asset plus the current timestamp and
//!   is `Clone`, so a caller can stage a transaction on a copy and commit it whole
//!
//! ## Failure Model
//!
//! Asset operations report failure by returning `false`, mirroring the contract
//! interface they stand in for. Callers decide how to surface that; the exchange
//! core turns every `false` into a hard error. Unknown asset identifiers are a
//! [`LedgerError`].

pub mod asset;
pub mod error;
pub mod fee_token;
pub mod host;
pub mod token;

pub use asset::FungibleAsset;
pub use error::LedgerError;
pub use fee_token::FeeOnTransferToken;
pub use host::{AssetHost, Ledger};
pub use token::StandardToken;
