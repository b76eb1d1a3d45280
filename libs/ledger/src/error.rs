//! Host ledger errors

use thiserror::Error;
use types::Address;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Unknown asset {0}")]
    UnknownAsset(Address),

    #[error("Asset {0} is already deployed")]
    AssetExists(Address),

    #[error("Cannot deploy an asset at the zero address")]
    ZeroAddress,
}
