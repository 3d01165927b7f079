//! Application Layer - use cases composing ports and domain logic.

pub mod aggregator;
pub mod orchestrator;
pub mod planner;
pub mod quotes;

pub use aggregator::{AggregateError, PortfolioAggregator};
pub use orchestrator::{OrchestratorError, RebalanceOrchestrator, RebalanceOutcome};
pub use planner::{PlanError, Planner, RulePolicy, TOLERANCE_PP};
pub use quotes::QuotePipeline;
