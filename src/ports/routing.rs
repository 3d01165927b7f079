//! Routing/quote service port.
//!
//! A routing service turns one rebalance action into an execution quote:
//! estimated output, fees, and optionally a ready-to-sign transaction.
//! The wire shapes follow the LI.FI quote API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::strategy::RebalanceAction;

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("routing API request failed: {0}")]
    Api(String),
    #[error("no route found: {0}")]
    NoRoute(String),
    #[error("invalid quote parameters: {0}")]
    InvalidParameters(String),
}

/// Token descriptor as echoed back by the routing service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteToken {
    pub symbol: String,
    pub address: String,
}

/// What the quote covers: source and destination of the transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteAction {
    pub from_chain_id: u64,
    pub to_chain_id: u64,
    pub from_token: QuoteToken,
    pub to_token: QuoteToken,
    pub from_amount: String,
    pub to_amount: String,
}

/// One fee or gas cost line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostItem {
    pub amount: String,
    pub token: QuoteToken,
}

/// Execution estimate for the quoted route.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteEstimate {
    pub from_amount: String,
    pub to_amount: String,
    pub to_amount_min: String,
    #[serde(default)]
    pub approval_address: String,
    /// Estimated execution time in seconds
    #[serde(default)]
    pub execution_duration: f64,
    #[serde(default)]
    pub fee_costs: Vec<CostItem>,
    #[serde(default)]
    pub gas_costs: Vec<CostItem>,
}

/// Ready-to-sign transaction data, present when the route is executable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub to: String,
    pub data: String,
    pub value: String,
    pub gas_limit: String,
    pub chain_id: u64,
}

/// A routing service's quote for executing one action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Name of the tool/bridge selected by the router
    pub tool: String,
    pub action: QuoteAction,
    pub estimate: QuoteEstimate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_request: Option<TransactionRequest>,
}

#[async_trait]
pub trait RoutingPort: Send + Sync {
    /// Request an execution quote for one action on behalf of `from_address`.
    async fn quote(
        &self,
        action: &RebalanceAction,
        from_address: &str,
    ) -> Result<Quote, RoutingError>;
}
