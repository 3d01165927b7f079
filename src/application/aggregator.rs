//! Portfolio Aggregator
//!
//! Fans one balance fetch out per (chain, asset) pair in the registry,
//! joins on all of them, and folds the results into one Portfolio snapshot.
//! Individual failed reads degrade to omission; only a structurally invalid
//! address fails the whole call.

use std::sync::Arc;

use futures::future::join_all;
use thiserror::Error;

use crate::domain::asset::is_valid_address;
use crate::domain::portfolio::Portfolio;
use crate::ports::balance::BalancePort;
use crate::registry::Registry;

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("invalid account address: {0}")]
    InvalidAddress(String),
}

/// Collects one consistent snapshot of a wallet across all chains.
pub struct PortfolioAggregator {
    registry: Arc<Registry>,
    source: Arc<dyn BalancePort>,
}

impl PortfolioAggregator {
    pub fn new(registry: Arc<Registry>, source: Arc<dyn BalancePort>) -> Self {
        Self { registry, source }
    }

    /// Fetch every registry pair concurrently and build the snapshot.
    ///
    /// Output order is the registry enumeration order regardless of fetch
    /// completion order: `join_all` yields results positionally, so the
    /// fold below never observes completion order at all.
    pub async fn aggregate(
        &self,
        address: &str,
        display_name: Option<String>,
    ) -> Result<Portfolio, AggregateError> {
        if !is_valid_address(address) {
            return Err(AggregateError::InvalidAddress(address.to_string()));
        }

        let pairs = self.registry.enumerate();
        tracing::info!(
            address,
            pairs = pairs.len(),
            "aggregating portfolio across chains"
        );

        let fetches = pairs
            .iter()
            .map(|(chain, asset)| self.source.fetch(chain, asset, address));
        let results = join_all(fetches).await;

        let mut balances = Vec::new();
        for ((chain, asset), result) in pairs.iter().zip(results) {
            match result {
                Ok(balance) if balance.is_zero() => {}
                Ok(balance) => balances.push(balance),
                Err(e) => {
                    tracing::warn!(
                        chain = chain.id,
                        symbol = %asset.symbol,
                        "balance read unavailable, omitting: {e}"
                    );
                }
            }
        }

        tracing::info!(found = balances.len(), "portfolio snapshot complete");
        Ok(Portfolio::new(address.to_string(), display_name, balances))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mocks::MockBalanceSource;

    const WALLET: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

    fn aggregator(source: MockBalanceSource) -> PortfolioAggregator {
        PortfolioAggregator::new(Arc::new(Registry::mainnet()), Arc::new(source))
    }

    #[tokio::test]
    async fn test_invalid_address_fails_fast() {
        let agg = aggregator(MockBalanceSource::new());
        let result = agg.aggregate("vitalik.eth", None).await;
        assert!(matches!(result, Err(AggregateError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn test_failed_reads_degrade_to_omission() {
        // Two chains fail entirely, one succeeds with a non-zero balance.
        let source = MockBalanceSource::new().with_balance(8453, "USDC", 5_000_000);
        let portfolio = aggregator(source).aggregate(WALLET, None).await.unwrap();
        assert_eq!(portfolio.balances.len(), 1);
        assert_eq!(portfolio.balances[0].chain.id, 8453);
        assert_eq!(portfolio.balances[0].asset.symbol, "USDC");
    }

    #[tokio::test]
    async fn test_zero_balances_are_filtered() {
        let source = MockBalanceSource::new()
            .with_balance(1, "ETH", 0)
            .with_balance(1, "USDC", 1_000_000);
        let portfolio = aggregator(source).aggregate(WALLET, None).await.unwrap();
        assert_eq!(portfolio.balances.len(), 1);
        assert_eq!(portfolio.balances[0].asset.symbol, "USDC");
    }

    #[tokio::test]
    async fn test_order_is_registry_order_despite_completion_order() {
        // The Ethereum reads resolve last; the snapshot must still list
        // Ethereum first.
        let source = MockBalanceSource::new()
            .with_balance(1, "USDC", 1_000_000)
            .with_delay(1, "USDC", 50)
            .with_balance(42161, "WETH", 2_000_000_000_000_000_000)
            .with_balance(10, "USDC", 3_000_000);
        let portfolio = aggregator(source).aggregate(WALLET, None).await.unwrap();

        let seen: Vec<(u64, String)> = portfolio
            .balances
            .iter()
            .map(|b| (b.chain.id, b.asset.symbol.clone()))
            .collect();
        assert_eq!(
            seen,
            vec![
                (1, "USDC".to_string()),
                (42161, "WETH".to_string()),
                (10, "USDC".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_no_duplicate_chain_asset_pairs() {
        let source = MockBalanceSource::new()
            .with_balance(1, "USDC", 1_000_000)
            .with_balance(42161, "USDC", 1_000_000);
        let portfolio = aggregator(source).aggregate(WALLET, None).await.unwrap();

        let mut keys: Vec<(u64, String)> = portfolio
            .balances
            .iter()
            .map(|b| (b.chain.id, b.asset.symbol.clone()))
            .collect();
        let before = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), before);
    }

    #[tokio::test]
    async fn test_display_name_carried_through() {
        let source = MockBalanceSource::new().with_balance(1, "ETH", 1);
        let portfolio = aggregator(source)
            .aggregate(WALLET, Some("vitalik.eth".to_string()))
            .await
            .unwrap();
        assert_eq!(portfolio.display_name.as_deref(), Some("vitalik.eth"));
    }
}
