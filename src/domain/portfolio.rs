//! Portfolio snapshot across all supported chains.

use serde::{Deserialize, Serialize};

use super::balance::TokenBalance;

/// One wallet's holdings across every supported chain at a point in time.
///
/// Invariants upheld by the aggregator: at most one entry per (chain, asset)
/// pair, no zero balances, entries in registry enumeration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    pub address: String,
    /// Resolved display name (e.g. an ENS name), when known
    pub display_name: Option<String>,
    pub balances: Vec<TokenBalance>,
    /// USD valuation placeholder; no price oracle is wired in
    pub total_value_usd: f64,
}

impl Portfolio {
    pub fn new(address: String, display_name: Option<String>, balances: Vec<TokenBalance>) -> Self {
        Self {
            address,
            display_name,
            balances,
            total_value_usd: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// All holdings of one symbol, across chains, in snapshot order.
    pub fn balances_of<'a>(&'a self, symbol: &'a str) -> impl Iterator<Item = &'a TokenBalance> {
        self.balances.iter().filter(move |b| b.asset.symbol == symbol)
    }

    /// The holding of `symbol` on `chain_id`, if any.
    pub fn balance_on(&self, chain_id: u64, symbol: &str) -> Option<&TokenBalance> {
        self.balances
            .iter()
            .find(|b| b.chain.id == chain_id && b.asset.symbol == symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::asset::{Asset, Chain};
    use num_bigint::BigUint;

    fn snapshot() -> Portfolio {
        let eth = Chain::new(1, "eth", "Ethereum");
        let arb = Chain::new(42161, "arb", "Arbitrum");
        Portfolio::new(
            "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".to_string(),
            Some("vitalik.eth".to_string()),
            vec![
                TokenBalance::new(
                    eth.clone(),
                    Asset::erc20("USDC", "0xA0b8", 6),
                    BigUint::from(5_000_000u64),
                ),
                TokenBalance::new(eth, Asset::native("ETH", 18), BigUint::from(1u64)),
                TokenBalance::new(
                    arb,
                    Asset::erc20("USDC", "0xaf88", 6),
                    BigUint::from(3_000_000u64),
                ),
            ],
        )
    }

    #[test]
    fn test_balances_of_spans_chains() {
        let p = snapshot();
        assert_eq!(p.balances_of("USDC").count(), 2);
        assert_eq!(p.balances_of("ETH").count(), 1);
        assert_eq!(p.balances_of("WETH").count(), 0);
    }

    #[test]
    fn test_balance_on_is_chain_scoped() {
        let p = snapshot();
        assert!(p.balance_on(1, "USDC").is_some());
        assert!(p.balance_on(42161, "ETH").is_none());
    }
}
