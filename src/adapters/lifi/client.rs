//! LI.FI API Client
//!
//! HTTP client for the LI.FI cross-chain routing API. Handles quote
//! fetching for swap/bridge actions, transfer status checks, and the
//! supported-chain listing.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::strategy::RebalanceAction;
use crate::ports::routing::{Quote, RoutingError, RoutingPort};

/// LI.FI client configuration
#[derive(Debug, Clone)]
pub struct LifiConfig {
    /// Base URL for the LI.FI API
    pub api_base_url: String,
    /// Optional API key for higher rate limits
    pub api_key: Option<String>,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for LifiConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://li.quest/v1".to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Status of a cross-chain transfer previously submitted through a quote.
#[derive(Debug, Clone, Deserialize)]
pub struct TransferStatus {
    pub status: String,
    #[serde(default)]
    pub substatus: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChainListing {
    chains: Vec<ListedChain>,
}

/// One chain as reported by the routing service.
#[derive(Debug, Clone, Deserialize)]
pub struct ListedChain {
    pub id: u64,
    pub key: String,
    pub name: String,
}

/// LI.FI routing client
#[derive(Debug, Clone)]
pub struct LifiClient {
    config: LifiConfig,
    http: Client,
}

impl LifiClient {
    /// Create a client with default configuration.
    pub fn new() -> Result<Self, RoutingError> {
        Self::with_config(LifiConfig::default())
    }

    pub fn with_config(config: LifiConfig) -> Result<Self, RoutingError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RoutingError::Api(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    /// Check the status of a cross-chain transfer by transaction hash.
    pub async fn transfer_status(
        &self,
        tx_hash: &str,
        from_chain: Option<u64>,
        to_chain: Option<u64>,
    ) -> Result<TransferStatus, RoutingError> {
        let url = format!("{}/status", self.config.api_base_url);
        let mut query: Vec<(&str, String)> = vec![("txHash", tx_hash.to_string())];
        if let Some(id) = from_chain {
            query.push(("fromChain", id.to_string()));
        }
        if let Some(id) = to_chain {
            query.push(("toChain", id.to_string()));
        }

        let response = self
            .request(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| RoutingError::Api(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RoutingError::Api(format!(
                "status check failed: HTTP {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| RoutingError::Api(e.to_string()))
    }

    /// List the chains the routing service supports.
    pub async fn supported_chains(&self) -> Result<Vec<ListedChain>, RoutingError> {
        let url = format!("{}/chains", self.config.api_base_url);
        let response = self
            .request(&url)
            .send()
            .await
            .map_err(|e| RoutingError::Api(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RoutingError::Api(format!(
                "chain listing failed: HTTP {}",
                response.status()
            )));
        }

        let listing: ChainListing = response
            .json()
            .await
            .map_err(|e| RoutingError::Api(e.to_string()))?;
        Ok(listing.chains)
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self.http.get(url);
        if let Some(ref key) = self.config.api_key {
            req = req.header("x-lifi-api-key", key);
        }
        req
    }
}

#[async_trait]
impl RoutingPort for LifiClient {
    async fn quote(
        &self,
        action: &RebalanceAction,
        from_address: &str,
    ) -> Result<Quote, RoutingError> {
        let url = format!("{}/quote", self.config.api_base_url);

        tracing::debug!(
            from_chain = action.from_chain,
            to_chain = action.to_chain,
            from_token = %action.from_token,
            to_token = %action.to_token,
            amount = %action.amount,
            "requesting route quote"
        );

        let response = self
            .request(&url)
            .query(&[
                ("fromChain", action.from_chain.to_string()),
                ("toChain", action.to_chain.to_string()),
                ("fromToken", action.from_token.clone()),
                ("toToken", action.to_token.clone()),
                ("fromAmount", action.amount.clone()),
                ("fromAddress", from_address.to_string()),
            ])
            .send()
            .await
            .map_err(|e| RoutingError::Api(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            let body = response.text().await.unwrap_or_default();
            return Err(RoutingError::NoRoute(body));
        }
        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(RoutingError::InvalidParameters(format!(
                "HTTP {status}: {body}"
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RoutingError::Api(format!("HTTP {status}: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| RoutingError::Api(format!("malformed quote response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifi_config_default() {
        let config = LifiConfig::default();
        assert_eq!(config.api_base_url, "https://li.quest/v1");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_lifi_client_creation() {
        assert!(LifiClient::new().is_ok());
    }
}
