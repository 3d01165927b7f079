//! Chain and asset identity types.
//!
//! A `Chain` is one supported EVM network; an `Asset` is either the chain's
//! native currency or an ERC-20 contract tracked on it. Both are immutable
//! after registry construction.

use serde::{Deserialize, Serialize};

/// Sentinel address used for the native asset of a chain.
pub const NATIVE_ASSET_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// One supported blockchain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    /// Numeric chain id, globally unique among supported chains
    pub id: u64,
    /// Short key, e.g. "eth"
    pub key: String,
    /// Display name, e.g. "Ethereum"
    pub name: String,
}

impl Chain {
    pub fn new(id: u64, key: &str, name: &str) -> Self {
        Self {
            id,
            key: key.to_string(),
            name: name.to_string(),
        }
    }
}

/// A fungible asset tracked on one chain: the native currency or an ERC-20.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Ticker symbol, e.g. "USDC"
    pub symbol: String,
    /// Contract address, or the zero-address sentinel for the native asset
    pub address: String,
    /// Decimal precision for converting raw quantities to display amounts
    pub decimals: u8,
}

impl Asset {
    /// Describe a chain's native currency.
    pub fn native(symbol: &str, decimals: u8) -> Self {
        Self {
            symbol: symbol.to_string(),
            address: NATIVE_ASSET_ADDRESS.to_string(),
            decimals,
        }
    }

    /// Describe an ERC-20 token at `address`.
    pub fn erc20(symbol: &str, address: &str, decimals: u8) -> Self {
        Self {
            symbol: symbol.to_string(),
            address: address.to_string(),
            decimals,
        }
    }

    pub fn is_native(&self) -> bool {
        self.address == NATIVE_ASSET_ADDRESS
    }
}

/// Check that a string is a structurally valid EVM account address.
pub fn is_valid_address(input: &str) -> bool {
    input.len() == 42
        && input.starts_with("0x")
        && input[2..].chars().all(|c| c.is_ascii_hexdigit())
}
