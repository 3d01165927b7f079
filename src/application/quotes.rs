//! Quote Pipeline
//!
//! Requests an execution quote for every planned action. Quotes run
//! concurrently but results come back in input order, and a failed quote
//! is recorded as a failed result rather than aborting the batch.

use std::sync::Arc;

use futures::future::join_all;

use crate::domain::execution::ExecutionResult;
use crate::domain::strategy::RebalanceAction;
use crate::ports::routing::RoutingPort;

pub struct QuotePipeline {
    router: Arc<dyn RoutingPort>,
}

impl QuotePipeline {
    pub fn new(router: Arc<dyn RoutingPort>) -> Self {
        Self { router }
    }

    /// One ExecutionResult per input action, same order. A failed quote
    /// yields a `Failed` result with no quote attached and never
    /// short-circuits the remaining actions.
    pub async fn quote_all(
        &self,
        actions: &[RebalanceAction],
        from_address: &str,
    ) -> Vec<ExecutionResult> {
        tracing::info!(count = actions.len(), "requesting quotes for planned actions");

        let quotes = actions
            .iter()
            .map(|action| self.router.quote(action, from_address));
        let outcomes = join_all(quotes).await;

        actions
            .iter()
            .zip(outcomes)
            .map(|(action, outcome)| match outcome {
                Ok(quote) => ExecutionResult::quoted(action.clone(), quote),
                Err(e) => {
                    tracing::warn!(
                        from_token = %action.from_token,
                        to_token = %action.to_token,
                        "quote failed: {e}"
                    );
                    ExecutionResult::failed(action.clone())
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::execution::ExecutionStatus;
    use crate::domain::strategy::ActionKind;
    use crate::ports::mocks::MockRouter;

    const WALLET: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

    fn action(amount: &str) -> RebalanceAction {
        RebalanceAction {
            kind: ActionKind::Bridge,
            from_chain: 1,
            to_chain: 42161,
            from_token: "USDC".to_string(),
            to_token: "USDC".to_string(),
            amount: amount.to_string(),
            amount_formatted: format!("{amount} raw USDC"),
        }
    }

    #[tokio::test]
    async fn test_one_failure_never_short_circuits() {
        let actions = vec![action("100"), action("200"), action("300")];
        let router = MockRouter::new().with_failure("200");
        let pipeline = QuotePipeline::new(Arc::new(router));

        let results = pipeline.quote_all(&actions, WALLET).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].status, ExecutionStatus::Quoted);
        assert_eq!(results[1].status, ExecutionStatus::Failed);
        assert!(results[1].quote.is_none());
        assert_eq!(results[2].status, ExecutionStatus::Quoted);
    }

    #[tokio::test]
    async fn test_output_order_matches_input_despite_completion_order() {
        // The first action's quote resolves last; results must still be
        // returned in input order.
        let actions = vec![action("100"), action("200"), action("300")];
        let router = MockRouter::new().with_delay("100", 50);
        let pipeline = QuotePipeline::new(Arc::new(router));

        let results = pipeline.quote_all(&actions, WALLET).await;

        let amounts: Vec<&str> = results.iter().map(|r| r.action.amount.as_str()).collect();
        assert_eq!(amounts, vec!["100", "200", "300"]);
        assert!(results.iter().all(|r| r.status == ExecutionStatus::Quoted));
    }

    #[tokio::test]
    async fn test_empty_action_list_yields_empty_results() {
        let pipeline = QuotePipeline::new(Arc::new(MockRouter::new()));
        let results = pipeline.quote_all(&[], WALLET).await;
        assert!(results.is_empty());
    }
}
