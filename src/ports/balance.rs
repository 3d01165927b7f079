//! Chain balance-read port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::asset::{Asset, Chain};
use crate::domain::balance::TokenBalance;

/// Why a single balance read was unavailable.
///
/// Everything except `InvalidAddress` degrades to omission at the
/// aggregation layer; only a structurally bad address fails a whole run.
#[derive(Debug, Error)]
pub enum BalanceError {
    #[error("invalid account address: {0}")]
    InvalidAddress(String),
    #[error("chain {0} has no configured endpoint")]
    UnsupportedChain(u64),
    #[error("rpc request failed: {0}")]
    Rpc(String),
    #[error("malformed rpc response: {0}")]
    MalformedResponse(String),
}

#[async_trait]
pub trait BalancePort: Send + Sync {
    /// Read the current quantity of `asset` held by `address` on `chain`.
    /// One network read; no internal retries.
    async fn fetch(
        &self,
        chain: &Chain,
        asset: &Asset,
        address: &str,
    ) -> Result<TokenBalance, BalanceError>;
}
