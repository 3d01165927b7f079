//! Rebalance Orchestrator
//!
//! Runs the full pipeline: resolve the wallet, aggregate the portfolio,
//! generate and validate a strategy, then quote every planned action.

use std::sync::Arc;

use thiserror::Error;

use crate::application::aggregator::{AggregateError, PortfolioAggregator};
use crate::application::planner::{PlanError, Planner};
use crate::application::quotes::QuotePipeline;
use crate::domain::allocation::TargetAllocation;
use crate::domain::execution::ExecutionResult;
use crate::domain::portfolio::Portfolio;
use crate::domain::strategy::RebalanceStrategy;
use crate::ports::resolver::{ResolveError, ResolverPort};

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
    #[error(transparent)]
    Plan(#[from] PlanError),
}

/// Everything one run produces, handed to the presentation layer.
#[derive(Debug)]
pub struct RebalanceOutcome {
    pub portfolio: Portfolio,
    pub strategy: RebalanceStrategy,
    pub results: Vec<ExecutionResult>,
}

pub struct RebalanceOrchestrator {
    resolver: Arc<dyn ResolverPort>,
    aggregator: PortfolioAggregator,
    planner: Planner,
    pipeline: QuotePipeline,
}

impl RebalanceOrchestrator {
    pub fn new(
        resolver: Arc<dyn ResolverPort>,
        aggregator: PortfolioAggregator,
        planner: Planner,
        pipeline: QuotePipeline,
    ) -> Self {
        Self {
            resolver,
            aggregator,
            planner,
            pipeline,
        }
    }

    /// Resolve, aggregate, plan, quote. An empty plan skips quoting.
    pub async fn run(
        &self,
        wallet_input: &str,
        target: &TargetAllocation,
    ) -> Result<RebalanceOutcome, OrchestratorError> {
        let wallet = self.resolver.resolve(wallet_input).await?;
        tracing::info!(address = %wallet.address, "wallet resolved");

        let portfolio = self
            .aggregator
            .aggregate(&wallet.address, wallet.display_name)
            .await?;

        let strategy = self.planner.plan(&portfolio, target).await?;
        tracing::info!(
            actions = strategy.actions.len(),
            reasoning = %strategy.reasoning,
            "strategy generated"
        );

        let results = if strategy.actions.is_empty() {
            Vec::new()
        } else {
            self.pipeline
                .quote_all(&strategy.actions, &portfolio.address)
                .await
        };

        Ok(RebalanceOutcome {
            portfolio,
            strategy,
            results,
        })
    }
}
