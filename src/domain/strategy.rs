//! Rebalance actions and strategies, with structural validation.
//!
//! These are the shapes any strategy generator must produce, whether the
//! deterministic rule policy or an external backend. Validation rejects a
//! structurally inconsistent strategy outright; nothing is silently
//! repaired.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("swap action crosses chains: {from_chain} -> {to_chain}")]
    SwapAcrossChains { from_chain: u64, to_chain: u64 },
    #[error("bridge action changes token: {from_token} -> {to_token}")]
    BridgeChangesToken {
        from_token: String,
        to_token: String,
    },
    #[error("bridge action stays on chain {chain}")]
    BridgeWithoutChainChange { chain: u64 },
    #[error("action amount is not a non-negative integer: {amount:?}")]
    InvalidAmount { amount: String },
}

/// What an action does: exchange on one chain, or move across chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Swap,
    Bridge,
}

/// A single planned transfer.
///
/// Wire names follow the routing service's casing so externally generated
/// strategies deserialize directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalanceAction {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub from_chain: u64,
    pub to_chain: u64,
    pub from_token: String,
    pub to_token: String,
    /// Integer amount in the source asset's smallest unit
    pub amount: String,
    /// Human-readable amount, e.g. "500 USDC"
    pub amount_formatted: String,
}

impl RebalanceAction {
    /// Check the invariants that make an action executable:
    /// a swap stays on one chain, a bridge moves one token between two
    /// chains, and the amount parses as a non-negative integer.
    pub fn validate(&self) -> Result<(), StrategyError> {
        match self.kind {
            ActionKind::Swap => {
                if self.from_chain != self.to_chain {
                    return Err(StrategyError::SwapAcrossChains {
                        from_chain: self.from_chain,
                        to_chain: self.to_chain,
                    });
                }
            }
            ActionKind::Bridge => {
                if self.from_token != self.to_token {
                    return Err(StrategyError::BridgeChangesToken {
                        from_token: self.from_token.clone(),
                        to_token: self.to_token.clone(),
                    });
                }
                if self.from_chain == self.to_chain {
                    return Err(StrategyError::BridgeWithoutChainChange {
                        chain: self.from_chain,
                    });
                }
            }
        }

        if self.amount.parse::<BigUint>().is_err() {
            return Err(StrategyError::InvalidAmount {
                amount: self.amount.clone(),
            });
        }

        Ok(())
    }
}

/// Ordered action list plus a human-readable rationale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalanceStrategy {
    pub actions: Vec<RebalanceAction>,
    pub reasoning: String,
}

impl RebalanceStrategy {
    /// An empty strategy carrying only a rationale.
    pub fn empty(reasoning: &str) -> Self {
        Self {
            actions: Vec::new(),
            reasoning: reasoning.to_string(),
        }
    }

    /// Validate every action; the first violation fails the whole strategy.
    pub fn validate(&self) -> Result<(), StrategyError> {
        for action in &self.actions {
            action.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bridge_usdc() -> RebalanceAction {
        RebalanceAction {
            kind: ActionKind::Bridge,
            from_chain: 1,
            to_chain: 42161,
            from_token: "USDC".to_string(),
            to_token: "USDC".to_string(),
            amount: "500000000".to_string(),
            amount_formatted: "500 USDC".to_string(),
        }
    }

    #[test]
    fn test_valid_bridge_passes() {
        assert!(bridge_usdc().validate().is_ok());
    }

    #[test]
    fn test_swap_across_chains_rejected() {
        let mut action = bridge_usdc();
        action.kind = ActionKind::Swap;
        assert!(matches!(
            action.validate(),
            Err(StrategyError::SwapAcrossChains { .. })
        ));
    }

    #[test]
    fn test_bridge_changing_token_rejected() {
        let mut action = bridge_usdc();
        action.to_token = "WETH".to_string();
        assert!(matches!(
            action.validate(),
            Err(StrategyError::BridgeChangesToken { .. })
        ));
    }

    #[test]
    fn test_bridge_on_single_chain_rejected() {
        let mut action = bridge_usdc();
        action.to_chain = 1;
        assert!(matches!(
            action.validate(),
            Err(StrategyError::BridgeWithoutChainChange { .. })
        ));
    }

    #[test]
    fn test_garbage_amount_rejected() {
        let mut action = bridge_usdc();
        action.amount = "-5".to_string();
        assert!(matches!(
            action.validate(),
            Err(StrategyError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_wire_format_round_trip() {
        let json = r#"{
            "type": "bridge",
            "fromChain": 1,
            "toChain": 42161,
            "fromToken": "USDC",
            "toToken": "USDC",
            "amount": "500000000",
            "amountFormatted": "500 USDC"
        }"#;
        let action: RebalanceAction = serde_json::from_str(json).unwrap();
        assert_eq!(action, bridge_usdc());
    }
}
