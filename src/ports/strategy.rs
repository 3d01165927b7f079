//! Strategy-generation port.
//!
//! The planner consumes any generator through this seam: the deterministic
//! rule policy or an adapter around an external (LLM) backend. Output is
//! validated against the structural invariants by the planner, not here.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::allocation::TargetAllocation;
use crate::domain::portfolio::Portfolio;
use crate::domain::strategy::RebalanceStrategy;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("strategy backend failed: {0}")]
    Backend(String),
    #[error("strategy backend returned unparseable output: {0}")]
    UnparseableOutput(String),
}

#[async_trait]
pub trait StrategyGenerator: Send + Sync {
    /// Propose a rebalance strategy for `portfolio` toward `target`.
    async fn generate(
        &self,
        portfolio: &Portfolio,
        target: &TargetAllocation,
    ) -> Result<RebalanceStrategy, GeneratorError>;
}
