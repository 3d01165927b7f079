//! End-to-end pipeline tests over mocked ports: resolve a wallet,
//! aggregate balances, plan with the deterministic policy, and quote
//! every planned action.

use std::sync::Arc;

use chainhopper::application::aggregator::PortfolioAggregator;
use chainhopper::application::orchestrator::{OrchestratorError, RebalanceOrchestrator};
use chainhopper::application::planner::Planner;
use chainhopper::application::quotes::QuotePipeline;
use chainhopper::domain::allocation::TargetAllocation;
use chainhopper::domain::execution::ExecutionStatus;
use chainhopper::domain::strategy::ActionKind;
use chainhopper::ports::mocks::{MockBalanceSource, MockResolver, MockRouter};
use chainhopper::registry::Registry;

const WALLET: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

fn default_target() -> TargetAllocation {
    TargetAllocation::new([
        ("ETH".to_string(), 40.0),
        ("USDC".to_string(), 40.0),
        ("WETH".to_string(), 20.0),
    ])
    .unwrap()
}

fn orchestrator(
    source: MockBalanceSource,
    router: Arc<MockRouter>,
) -> RebalanceOrchestrator {
    let registry = Arc::new(Registry::mainnet());
    let resolver = MockResolver::new().with_entry("vitalik.eth", WALLET, Some("vitalik.eth"));
    RebalanceOrchestrator::new(
        Arc::new(resolver),
        PortfolioAggregator::new(registry.clone(), Arc::new(source)),
        Planner::rule_based(registry),
        QuotePipeline::new(router),
    )
}

#[tokio::test]
async fn test_single_stable_position_plans_two_swaps_and_quotes_both() {
    // 1000 USDC on Ethereum, nothing else.
    let source = MockBalanceSource::new().with_balance(1, "USDC", 1_000_000_000);
    let router = Arc::new(MockRouter::new());
    let orchestrator = orchestrator(source, router.clone());

    let outcome = orchestrator
        .run("vitalik.eth", &default_target())
        .await
        .unwrap();

    assert_eq!(outcome.portfolio.address, WALLET);
    assert_eq!(outcome.portfolio.balances.len(), 1);

    // 60pp surplus of USDC splits into the two deficits, largest first.
    let actions = &outcome.strategy.actions;
    assert_eq!(actions.len(), 2);
    assert!(actions.iter().all(|a| a.kind == ActionKind::Swap));
    assert!(actions.iter().all(|a| a.from_chain == 1 && a.to_chain == 1));
    assert_eq!(actions[0].to_token, "ETH");
    assert_eq!(actions[0].amount, "400000000");
    assert_eq!(actions[1].to_token, "WETH");
    assert_eq!(actions[1].amount, "200000000");

    assert_eq!(outcome.results.len(), 2);
    assert!(outcome
        .results
        .iter()
        .all(|r| r.status == ExecutionStatus::Quoted));
    assert_eq!(router.calls(), vec!["400000000", "200000000"]);
}

#[tokio::test]
async fn test_quote_failure_is_isolated_and_order_preserved() {
    let source = MockBalanceSource::new().with_balance(1, "USDC", 1_000_000_000);
    let router = Arc::new(
        MockRouter::new()
            .with_failure("400000000")
            .with_delay("200000000", 20),
    );
    let orchestrator = orchestrator(source, router);

    let outcome = orchestrator
        .run("vitalik.eth", &default_target())
        .await
        .unwrap();

    assert_eq!(outcome.results.len(), 2);
    assert_eq!(outcome.results[0].status, ExecutionStatus::Failed);
    assert!(outcome.results[0].quote.is_none());
    assert_eq!(outcome.results[0].action.amount, "400000000");
    assert_eq!(outcome.results[1].status, ExecutionStatus::Quoted);
    assert_eq!(outcome.results[1].action.amount, "200000000");
}

#[tokio::test]
async fn test_balanced_portfolio_skips_quoting_entirely() {
    // Exactly on target: 400 ETH-units, 400 USDC, 200 WETH-units.
    let source = MockBalanceSource::new()
        .with_balance(1, "ETH", 400_000_000_000_000_000_000)
        .with_balance(1, "USDC", 400_000_000)
        .with_balance(1, "WETH", 200_000_000_000_000_000_000);
    let router = Arc::new(MockRouter::new());
    let orchestrator = orchestrator(source, router.clone());

    let outcome = orchestrator
        .run("vitalik.eth", &default_target())
        .await
        .unwrap();

    assert!(outcome.strategy.actions.is_empty());
    assert!(outcome.results.is_empty());
    assert!(router.calls().is_empty());
}

#[tokio::test]
async fn test_empty_portfolio_yields_empty_plan() {
    // Every registry read fails; the snapshot is empty, not an error.
    let source = MockBalanceSource::new();
    let router = Arc::new(MockRouter::new());
    let orchestrator = orchestrator(source, router.clone());

    let outcome = orchestrator
        .run("vitalik.eth", &default_target())
        .await
        .unwrap();

    assert!(outcome.portfolio.is_empty());
    assert!(outcome.strategy.actions.is_empty());
    assert!(router.calls().is_empty());
}

#[tokio::test]
async fn test_unresolvable_wallet_fails_the_run() {
    let source = MockBalanceSource::new().with_balance(1, "USDC", 1_000_000_000);
    let router = Arc::new(MockRouter::new());
    let orchestrator = orchestrator(source, router);

    let result = orchestrator.run("nobody.eth", &default_target()).await;
    assert!(matches!(result, Err(OrchestratorError::Resolve(_))));
}

#[tokio::test]
async fn test_rerun_on_balanced_outcome_is_idempotent() {
    // Apply the planned swaps by hand, re-run, and expect no further actions.
    let source = MockBalanceSource::new()
        .with_balance(1, "ETH", 400_000_000_000_000_000_000)
        .with_balance(1, "USDC", 400_000_000)
        .with_balance(1, "WETH", 200_000_000_000_000_000_000);
    let router = Arc::new(MockRouter::new());
    let orchestrator = orchestrator(source, router);

    let first = orchestrator
        .run("vitalik.eth", &default_target())
        .await
        .unwrap();
    let second = orchestrator
        .run("vitalik.eth", &default_target())
        .await
        .unwrap();

    assert!(first.strategy.actions.is_empty());
    assert_eq!(
        first.strategy.reasoning, second.strategy.reasoning,
        "same inputs must produce the same plan"
    );
}
