//! Chain Registry - supported chains and the tokens tracked on each.
//!
//! Built once at startup and read-only afterward; safe for unsynchronized
//! concurrent reads. Enumeration order is fixed: chains in registry order,
//! per chain the native asset first, then tokens in listing order. The
//! aggregator relies on this order for reproducible snapshots.

use crate::domain::asset::{Asset, Chain};

/// One chain plus every asset tracked on it.
#[derive(Debug, Clone)]
pub struct ChainEntry {
    pub chain: Chain,
    pub native: Asset,
    pub tokens: Vec<Asset>,
}

impl ChainEntry {
    /// Native asset first, then tokens in listing order.
    pub fn assets(&self) -> impl Iterator<Item = &Asset> {
        std::iter::once(&self.native).chain(self.tokens.iter())
    }
}

/// Static table of supported chains and tracked tokens.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<ChainEntry>,
}

impl Registry {
    pub fn new(entries: Vec<ChainEntry>) -> Self {
        Self { entries }
    }

    /// The default mainnet set: Ethereum, Arbitrum, Base, Optimism with
    /// USDC/USDT/WETH where issued.
    pub fn mainnet() -> Self {
        let native_eth = || Asset::native("ETH", 18);
        Self::new(vec![
            ChainEntry {
                chain: Chain::new(1, "eth", "Ethereum"),
                native: native_eth(),
                tokens: vec![
                    Asset::erc20("USDC", "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", 6),
                    Asset::erc20("USDT", "0xdAC17F958D2ee523a2206206994597C13D831ec7", 6),
                    Asset::erc20("WETH", "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2", 18),
                ],
            },
            ChainEntry {
                chain: Chain::new(42161, "arb", "Arbitrum"),
                native: native_eth(),
                tokens: vec![
                    Asset::erc20("USDC", "0xaf88d065e77c8cC2239327C5EDb3A432268e5831", 6),
                    Asset::erc20("USDT", "0xFd086bC7CD5C481DCC9C85ebE478A1C0b69FCbb9", 6),
                    Asset::erc20("WETH", "0x82aF49447D8a07e3bd95BD0d56f35241523fBab1", 18),
                ],
            },
            ChainEntry {
                chain: Chain::new(8453, "bas", "Base"),
                native: native_eth(),
                tokens: vec![
                    Asset::erc20("USDC", "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913", 6),
                    Asset::erc20("WETH", "0x4200000000000000000000000000000000000006", 18),
                ],
            },
            ChainEntry {
                chain: Chain::new(10, "opt", "Optimism"),
                native: native_eth(),
                tokens: vec![
                    Asset::erc20("USDC", "0x0b2C639c533813f4Aa9D7837CAf62653d097Ff85", 6),
                    Asset::erc20("WETH", "0x4200000000000000000000000000000000000006", 18),
                ],
            },
        ])
    }

    pub fn entries(&self) -> &[ChainEntry] {
        &self.entries
    }

    pub fn chain(&self, chain_id: u64) -> Option<&Chain> {
        self.entries
            .iter()
            .find(|e| e.chain.id == chain_id)
            .map(|e| &e.chain)
    }

    /// Every (chain, asset) pair in deterministic enumeration order.
    pub fn enumerate(&self) -> Vec<(Chain, Asset)> {
        self.entries
            .iter()
            .flat_map(|e| e.assets().map(|a| (e.chain.clone(), a.clone())))
            .collect()
    }

    /// The asset named `symbol` on `chain_id`, if tracked there.
    pub fn asset_on(&self, chain_id: u64, symbol: &str) -> Option<&Asset> {
        self.entries
            .iter()
            .find(|e| e.chain.id == chain_id)?
            .assets()
            .find(|a| a.symbol == symbol)
    }

    /// First chain (in registry order) that tracks `symbol`.
    pub fn first_chain_with(&self, symbol: &str) -> Option<&Chain> {
        self.entries
            .iter()
            .find(|e| e.assets().any(|a| a.symbol == symbol))
            .map(|e| &e.chain)
    }
}
