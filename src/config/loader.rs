//! Configuration Loader
//!
//! Loads and validates configuration from TOML files. Secrets (API keys)
//! come from the environment, not from the config file.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub wallet: WalletSection,
    pub rpc: RpcSection,
    pub lifi: LifiSection,
    pub strategy: StrategySection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wallet: WalletSection::default(),
            rpc: RpcSection::default(),
            lifi: LifiSection::default(),
            strategy: StrategySection::default(),
        }
    }
}

/// Wallet defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WalletSection {
    /// Default wallet to analyze; an address or a resolvable name
    pub address: String,
}

impl Default for WalletSection {
    fn default() -> Self {
        Self {
            address: "vitalik.eth".to_string(),
        }
    }
}

/// Chain endpoint configuration, keyed by decimal chain id
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RpcSection {
    pub endpoints: HashMap<String, String>,
}

impl Default for RpcSection {
    fn default() -> Self {
        let endpoints = [
            (1u64, "https://eth.llamarpc.com"),
            (42161, "https://arb1.arbitrum.io/rpc"),
            (8453, "https://mainnet.base.org"),
            (10, "https://mainnet.optimism.io"),
        ]
        .into_iter()
        .map(|(id, url)| (id.to_string(), url.to_string()))
        .collect();
        Self { endpoints }
    }
}

impl RpcSection {
    /// (chain id, url) pairs, rejecting unparseable keys.
    pub fn parsed_endpoints(&self) -> Result<Vec<(u64, String)>, ConfigError> {
        let mut out = Vec::new();
        for (key, url) in &self.endpoints {
            let id: u64 = key.parse().map_err(|_| {
                ConfigError::Invalid(format!("rpc endpoint key is not a chain id: {key}"))
            })?;
            out.push((id, url.clone()));
        }
        out.sort_by_key(|(id, _)| *id);
        Ok(out)
    }
}

/// Routing API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LifiSection {
    pub api_url: String,
}

impl Default for LifiSection {
    fn default() -> Self {
        Self {
            api_url: "https://li.quest/v1".to_string(),
        }
    }
}

/// Strategy generation configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StrategySection {
    /// "rules" for the deterministic policy, "external" for the LLM backend
    pub mode: String,
    /// Target allocation percentages per symbol
    pub target: HashMap<String, f64>,
    /// Model name for the external backend
    pub model: String,
}

impl Default for StrategySection {
    fn default() -> Self {
        let target = [("ETH", 40.0), ("USDC", 40.0), ("WETH", 20.0)]
            .into_iter()
            .map(|(s, p)| (s.to_string(), p))
            .collect();
        Self {
            mode: "rules".to_string(),
            target,
            model: "gpt-4o".to_string(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rpc.endpoints.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one rpc endpoint is required".to_string(),
            ));
        }
        self.rpc.parsed_endpoints()?;
        match self.strategy.mode.as_str() {
            "rules" | "external" => {}
            other => {
                return Err(ConfigError::Invalid(format!(
                    "unknown strategy mode '{other}' (expected 'rules' or 'external')"
                )))
            }
        }
        for (symbol, pct) in &self.strategy.target {
            if *pct < 0.0 || !pct.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "target percentage for {symbol} must be a non-negative number"
                )));
            }
        }
        Ok(())
    }
}

/// Load configuration from a TOML file; a missing file yields defaults.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config = if path.exists() {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&raw)?
    } else {
        tracing::debug!("no config file at {}, using defaults", path.display());
        Config::default()
    };
    config.validate()?;
    Ok(config)
}
