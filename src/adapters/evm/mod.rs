//! EVM chain-state adapters: per-chain JSON-RPC balance reads.

pub mod rpc;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::asset::{is_valid_address, Asset, Chain};
use crate::domain::balance::TokenBalance;
use crate::ports::balance::{BalanceError, BalancePort};
use rpc::EvmRpcClient;

/// Balance source backed by one JSON-RPC client per supported chain.
///
/// Clients are created once at startup; a fetch against a chain without a
/// configured endpoint is an unavailable read, not a panic.
#[derive(Debug, Default)]
pub struct EvmBalanceSource {
    clients: HashMap<u64, EvmRpcClient>,
}

impl EvmBalanceSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the endpoint for one chain.
    pub fn with_endpoint(mut self, chain_id: u64, url: &str) -> Result<Self, BalanceError> {
        let client = EvmRpcClient::new(url.to_string())?;
        self.clients.insert(chain_id, client);
        Ok(self)
    }

    pub fn endpoint_count(&self) -> usize {
        self.clients.len()
    }
}

#[async_trait]
impl BalancePort for EvmBalanceSource {
    async fn fetch(
        &self,
        chain: &Chain,
        asset: &Asset,
        address: &str,
    ) -> Result<TokenBalance, BalanceError> {
        if !is_valid_address(address) {
            return Err(BalanceError::InvalidAddress(address.to_string()));
        }

        let client = self
            .clients
            .get(&chain.id)
            .ok_or(BalanceError::UnsupportedChain(chain.id))?;

        let raw = if asset.is_native() {
            client.native_balance(address).await?
        } else {
            client.erc20_balance(&asset.address, address).await?
        };

        Ok(TokenBalance::new(chain.clone(), asset.clone(), raw))
    }
}
