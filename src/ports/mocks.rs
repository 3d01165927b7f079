//! Hand-rolled port mocks with controlled responses, used by unit and
//! integration tests. No real network calls.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use num_bigint::BigUint;

use crate::domain::allocation::TargetAllocation;
use crate::domain::asset::{Asset, Chain};
use crate::domain::balance::TokenBalance;
use crate::domain::portfolio::Portfolio;
use crate::domain::strategy::{RebalanceAction, RebalanceStrategy};
use crate::ports::balance::{BalanceError, BalancePort};
use crate::ports::resolver::{ResolveError, ResolvedWallet, ResolverPort};
use crate::ports::routing::{
    Quote, QuoteAction, QuoteEstimate, QuoteToken, RoutingError, RoutingPort,
};
use crate::ports::strategy::{GeneratorError, StrategyGenerator};

/// Mock balance source keyed by (chain id, symbol).
///
/// Pairs without a configured response behave as failed reads, and an
/// optional per-pair delay lets tests force out-of-order completion.
#[derive(Debug, Default)]
pub struct MockBalanceSource {
    responses: HashMap<(u64, String), BigUint>,
    delays: HashMap<(u64, String), u64>,
    calls: Arc<Mutex<Vec<(u64, String)>>>,
}

impl MockBalanceSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure a successful read for (chain id, symbol).
    pub fn with_balance(mut self, chain_id: u64, symbol: &str, raw: u128) -> Self {
        self.responses
            .insert((chain_id, symbol.to_string()), BigUint::from(raw));
        self
    }

    /// Delay the response for (chain id, symbol) by `millis`.
    pub fn with_delay(mut self, chain_id: u64, symbol: &str, millis: u64) -> Self {
        self.delays.insert((chain_id, symbol.to_string()), millis);
        self
    }

    pub fn calls(&self) -> Vec<(u64, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BalancePort for MockBalanceSource {
    async fn fetch(
        &self,
        chain: &Chain,
        asset: &Asset,
        _address: &str,
    ) -> Result<TokenBalance, BalanceError> {
        let key = (chain.id, asset.symbol.clone());
        self.calls.lock().unwrap().push(key.clone());

        if let Some(&millis) = self.delays.get(&key) {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }

        match self.responses.get(&key) {
            Some(raw) => Ok(TokenBalance::new(chain.clone(), asset.clone(), raw.clone())),
            None => Err(BalanceError::Rpc(format!(
                "no response configured for {} on chain {}",
                asset.symbol, chain.id
            ))),
        }
    }
}

/// Mock router keyed by action amount (unique per action in practice).
///
/// Amounts registered as failures return a routing error; everything else
/// gets a synthetic quote echoing the action.
#[derive(Debug, Default)]
pub struct MockRouter {
    failing_amounts: Vec<String>,
    delays: HashMap<String, u64>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make quoting fail for any action with this raw amount.
    pub fn with_failure(mut self, amount: &str) -> Self {
        self.failing_amounts.push(amount.to_string());
        self
    }

    /// Delay the quote for actions with this raw amount by `millis`.
    pub fn with_delay(mut self, amount: &str, millis: u64) -> Self {
        self.delays.insert(amount.to_string(), millis);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RoutingPort for MockRouter {
    async fn quote(
        &self,
        action: &RebalanceAction,
        _from_address: &str,
    ) -> Result<Quote, RoutingError> {
        self.calls.lock().unwrap().push(action.amount.clone());

        if let Some(&millis) = self.delays.get(&action.amount) {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }

        if self.failing_amounts.contains(&action.amount) {
            return Err(RoutingError::NoRoute(format!(
                "no route for {} {}",
                action.amount, action.from_token
            )));
        }

        Ok(Quote {
            id: format!("mock-{}", action.amount),
            kind: "lifi".to_string(),
            tool: "mock".to_string(),
            action: QuoteAction {
                from_chain_id: action.from_chain,
                to_chain_id: action.to_chain,
                from_token: QuoteToken {
                    symbol: action.from_token.clone(),
                    address: String::new(),
                },
                to_token: QuoteToken {
                    symbol: action.to_token.clone(),
                    address: String::new(),
                },
                from_amount: action.amount.clone(),
                to_amount: action.amount.clone(),
            },
            estimate: QuoteEstimate {
                from_amount: action.amount.clone(),
                to_amount: action.amount.clone(),
                to_amount_min: action.amount.clone(),
                approval_address: String::new(),
                execution_duration: 30.0,
                fee_costs: Vec::new(),
                gas_costs: Vec::new(),
            },
            transaction_request: None,
        })
    }
}

/// Mock resolver mapping names to addresses from a fixed table.
#[derive(Debug, Default)]
pub struct MockResolver {
    entries: HashMap<String, ResolvedWallet>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `input` as resolving to `address` with an optional name.
    pub fn with_entry(mut self, input: &str, address: &str, display_name: Option<&str>) -> Self {
        self.entries.insert(
            input.to_string(),
            ResolvedWallet {
                address: address.to_string(),
                display_name: display_name.map(str::to_string),
            },
        );
        self
    }
}

#[async_trait]
impl ResolverPort for MockResolver {
    async fn resolve(&self, input: &str) -> Result<ResolvedWallet, ResolveError> {
        self.entries
            .get(input)
            .cloned()
            .ok_or_else(|| ResolveError::NotFound(input.to_string()))
    }

    async fn reverse_resolve(&self, address: &str) -> Result<Option<String>, ResolveError> {
        Ok(self
            .entries
            .values()
            .find(|w| w.address == address)
            .and_then(|w| w.display_name.clone()))
    }
}

/// Mock strategy generator returning a preset strategy.
#[derive(Debug)]
pub struct MockGenerator {
    strategy: RebalanceStrategy,
}

impl MockGenerator {
    pub fn returning(strategy: RebalanceStrategy) -> Self {
        Self { strategy }
    }
}

#[async_trait]
impl StrategyGenerator for MockGenerator {
    async fn generate(
        &self,
        _portfolio: &Portfolio,
        _target: &TargetAllocation,
    ) -> Result<RebalanceStrategy, GeneratorError> {
        Ok(self.strategy.clone())
    }
}
