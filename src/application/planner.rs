//! Rebalance Planner
//!
//! Turns a Portfolio plus a TargetAllocation into a RebalanceStrategy.
//! The deterministic `RulePolicy` is the reference generator; any external
//! generator plugs in through the same `StrategyGenerator` seam. The
//! planner validates whatever the generator returns and rejects
//! structurally invalid strategies instead of repairing them.
//!
//! With no price oracle wired in, allocation shares are computed over
//! decimal-scaled token units: one whole unit of any asset counts the same.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use thiserror::Error;

use crate::domain::allocation::TargetAllocation;
use crate::domain::asset::Asset;
use crate::domain::balance::{format_units, parse_units};
use crate::domain::portfolio::Portfolio;
use crate::domain::strategy::{ActionKind, RebalanceAction, RebalanceStrategy, StrategyError};
use crate::ports::strategy::{GeneratorError, StrategyGenerator};
use crate::registry::Registry;

/// Deviation band (percentage points) within which no action is planned.
pub const TOLERANCE_PP: f64 = 2.0;

const EPS: f64 = 1e-9;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    #[error("generated strategy violates structural invariants: {0}")]
    ContractViolation(#[from] StrategyError),
}

/// Validates generator output before it reaches any caller.
pub struct Planner {
    generator: Arc<dyn StrategyGenerator>,
}

impl Planner {
    pub fn new(generator: Arc<dyn StrategyGenerator>) -> Self {
        Self { generator }
    }

    /// Planner running the deterministic reference policy.
    pub fn rule_based(registry: Arc<Registry>) -> Self {
        Self::new(Arc::new(RulePolicy::new(registry)))
    }

    pub async fn plan(
        &self,
        portfolio: &Portfolio,
        target: &TargetAllocation,
    ) -> Result<RebalanceStrategy, PlanError> {
        let strategy = self.generator.generate(portfolio, target).await?;
        strategy.validate()?;
        Ok(strategy)
    }
}

/// One source holding with the amount not yet committed to an action.
struct SourceSlot {
    chain_id: u64,
    asset: Asset,
    remaining_raw: BigUint,
}

impl SourceSlot {
    fn remaining_units(&self) -> f64 {
        let raw = self.remaining_raw.to_f64().unwrap_or(f64::MAX);
        raw / 10f64.powi(self.asset.decimals as i32)
    }
}

struct Surplus {
    symbol: String,
    left_pct: f64,
    slots: Vec<SourceSlot>,
}

impl Surplus {
    fn has_funds(&self) -> bool {
        self.slots.iter().any(|s| !s.remaining_raw.is_zero())
    }
}

struct Deficit {
    symbol: String,
    left_pct: f64,
}

/// Deterministic reference rebalancing policy.
pub struct RulePolicy {
    registry: Arc<Registry>,
}

impl RulePolicy {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Plan actions moving value from over-allocated symbols toward
    /// under-allocated ones. Pure function of its inputs.
    pub fn plan(&self, portfolio: &Portfolio, target: &TargetAllocation) -> RebalanceStrategy {
        let shares = current_shares(portfolio);
        let total_units: f64 = portfolio.balances.iter().map(|b| b.units()).sum();

        if portfolio.is_empty() || total_units <= 0.0 {
            return RebalanceStrategy::empty("no actionable positions found");
        }

        // Deviation per targeted symbol, in target (symbol-sorted) order.
        let deviations: Vec<(String, f64)> = target
            .iter()
            .map(|(symbol, target_pct)| {
                let current = shares.get(symbol).copied().unwrap_or(0.0);
                (symbol.to_string(), target_pct - current)
            })
            .collect();

        let out_of_tol: Vec<&(String, f64)> = deviations
            .iter()
            .filter(|(_, dev)| dev.abs() > TOLERANCE_PP)
            .collect();
        if out_of_tol.is_empty() {
            return RebalanceStrategy::empty(
                "portfolio is balanced within the 2% tolerance band",
            );
        }
        let max_actions = out_of_tol.len();

        let mut surpluses = self.collect_surpluses(portfolio, &deviations);
        let mut deficits: Vec<Deficit> = deviations
            .iter()
            .filter(|(_, dev)| *dev > TOLERANCE_PP)
            .map(|(symbol, dev)| Deficit {
                symbol: symbol.clone(),
                left_pct: *dev,
            })
            .collect();

        // Largest imbalance first; symbol breaks ties for determinism.
        surpluses.sort_by(|a, b| {
            b.left_pct
                .partial_cmp(&a.left_pct)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.symbol.cmp(&b.symbol))
        });
        deficits.sort_by(|a, b| {
            b.left_pct
                .partial_cmp(&a.left_pct)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.symbol.cmp(&b.symbol))
        });

        if surpluses.is_empty() {
            return RebalanceStrategy::empty(
                "all deviations are under-allocations with no surplus position to draw from",
            );
        }
        if deficits.is_empty() {
            return RebalanceStrategy::empty(
                "no under-allocated target is available to receive surplus value",
            );
        }

        let actions = self.match_flows(&mut surpluses, &mut deficits, total_units, max_actions);
        let reasoning = describe(&out_of_tol, actions.len());
        RebalanceStrategy { actions, reasoning }
    }

    /// Over-allocated symbols with their holdings, largest holding first.
    fn collect_surpluses(
        &self,
        portfolio: &Portfolio,
        deviations: &[(String, f64)],
    ) -> Vec<Surplus> {
        deviations
            .iter()
            .filter(|(_, dev)| *dev < -TOLERANCE_PP)
            .map(|(symbol, dev)| {
                let mut slots: Vec<SourceSlot> = portfolio
                    .balances_of(symbol)
                    .map(|b| SourceSlot {
                        chain_id: b.chain.id,
                        asset: b.asset.clone(),
                        remaining_raw: b.raw.clone(),
                    })
                    .collect();
                // Stable sort keeps snapshot order among equal holdings.
                slots.sort_by(|a, b| {
                    b.remaining_units()
                        .partial_cmp(&a.remaining_units())
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                Surplus {
                    symbol: symbol.clone(),
                    left_pct: -dev,
                    slots,
                }
            })
            .collect()
    }

    /// Greedy two-pointer matching of surpluses to deficits. Each pairing
    /// emits at most one action, so the action count stays below the
    /// number of out-of-tolerance symbols.
    fn match_flows(
        &self,
        surpluses: &mut [Surplus],
        deficits: &mut [Deficit],
        total_units: f64,
        max_actions: usize,
    ) -> Vec<RebalanceAction> {
        let mut actions = Vec::new();
        let (mut i, mut j) = (0, 0);

        while i < surpluses.len() && j < deficits.len() && actions.len() < max_actions {
            let surplus = &mut surpluses[i];
            if surplus.left_pct <= EPS || !surplus.has_funds() {
                i += 1;
                continue;
            }
            let deficit = &mut deficits[j];
            if deficit.left_pct <= EPS {
                j += 1;
                continue;
            }

            let intended_units =
                surplus.left_pct.min(deficit.left_pct) / 100.0 * total_units;

            // Prefer a slot whose own chain lists the deficit token: one
            // same-chain swap resolves the pairing without bridging.
            let swap_slot = surplus
                .slots
                .iter()
                .position(|s| {
                    !s.remaining_raw.is_zero()
                        && self.registry.asset_on(s.chain_id, &deficit.symbol).is_some()
                });

            let (slot_idx, kind, to_chain, to_token) = match swap_slot {
                Some(idx) => {
                    let chain_id = surplus.slots[idx].chain_id;
                    (idx, ActionKind::Swap, chain_id, deficit.symbol.clone())
                }
                None => {
                    // No chain holds the surplus token where the deficit
                    // token is listed; stage the value with a same-token
                    // bridge to the first chain that lists it.
                    let Some(dest) = self.registry.first_chain_with(&deficit.symbol) else {
                        // Token unknown to the registry; nothing can route it.
                        j += 1;
                        continue;
                    };
                    let Some(idx) = surplus
                        .slots
                        .iter()
                        .position(|s| !s.remaining_raw.is_zero())
                    else {
                        i += 1;
                        continue;
                    };
                    (idx, ActionKind::Bridge, dest.id, surplus.symbol.clone())
                }
            };

            let slot = &mut surplus.slots[slot_idx];
            let moved_units = intended_units.min(slot.remaining_units());
            let mut raw = parse_units(moved_units, slot.asset.decimals);
            if raw > slot.remaining_raw {
                raw = slot.remaining_raw.clone();
            }
            if raw.is_zero() {
                slot.remaining_raw = BigUint::zero();
                continue;
            }

            actions.push(RebalanceAction {
                kind,
                from_chain: slot.chain_id,
                to_chain,
                from_token: surplus.symbol.clone(),
                to_token,
                amount: raw.to_string(),
                amount_formatted: format!(
                    "{} {}",
                    format_units(&raw, slot.asset.decimals),
                    surplus.symbol
                ),
            });

            slot.remaining_raw -= &raw;
            let moved_pct = moved_units / total_units * 100.0;
            surplus.left_pct -= moved_pct;
            deficits[j].left_pct -= moved_pct;

            if surpluses[i].left_pct <= EPS || !surpluses[i].has_funds() {
                i += 1;
            }
            if deficits[j].left_pct <= EPS {
                j += 1;
            }
        }

        actions
    }
}

#[async_trait]
impl StrategyGenerator for RulePolicy {
    async fn generate(
        &self,
        portfolio: &Portfolio,
        target: &TargetAllocation,
    ) -> Result<RebalanceStrategy, GeneratorError> {
        Ok(self.plan(portfolio, target))
    }
}

/// Current percentage share of the portfolio per symbol, over token units.
fn current_shares(portfolio: &Portfolio) -> BTreeMap<String, f64> {
    let mut units: BTreeMap<String, f64> = BTreeMap::new();
    for balance in &portfolio.balances {
        *units.entry(balance.asset.symbol.clone()).or_insert(0.0) += balance.units();
    }
    let total: f64 = units.values().sum();
    if total <= 0.0 {
        return BTreeMap::new();
    }
    units
        .into_iter()
        .map(|(symbol, u)| (symbol, u / total * 100.0))
        .collect()
}

fn describe(out_of_tol: &[&(String, f64)], action_count: usize) -> String {
    let parts: Vec<String> = out_of_tol
        .iter()
        .map(|(symbol, dev)| {
            if *dev > 0.0 {
                format!("{symbol} is {:.1}pp under target", dev)
            } else {
                format!("{symbol} is {:.1}pp over target", -dev)
            }
        })
        .collect();
    format!(
        "{}; planned {} action(s) moving surplus value toward under-allocated assets",
        parts.join("; "),
        action_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::asset::Chain;
    use crate::domain::balance::TokenBalance;
    use crate::ports::mocks::MockGenerator;

    fn registry() -> Arc<Registry> {
        Arc::new(Registry::mainnet())
    }

    fn balance(chain_id: u64, symbol: &str, raw: u128) -> TokenBalance {
        let registry = Registry::mainnet();
        let chain = registry.chain(chain_id).unwrap().clone();
        let asset = registry.asset_on(chain_id, symbol).unwrap().clone();
        TokenBalance::new(chain, asset, BigUint::from(raw))
    }

    fn portfolio(balances: Vec<TokenBalance>) -> Portfolio {
        Portfolio::new(
            "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".to_string(),
            None,
            balances,
        )
    }

    fn target(entries: &[(&str, f64)]) -> TargetAllocation {
        TargetAllocation::new(entries.iter().map(|(s, p)| (s.to_string(), *p))).unwrap()
    }

    #[test]
    fn test_empty_portfolio_has_fixed_rationale() {
        let policy = RulePolicy::new(registry());
        let strategy = policy.plan(&portfolio(vec![]), &target(&[("USDC", 100.0)]));
        assert!(strategy.actions.is_empty());
        assert_eq!(strategy.reasoning, "no actionable positions found");
    }

    #[test]
    fn test_within_tolerance_is_balanced() {
        // 49.85% / 50.15% against a 50/50 target: inside the 2pp band.
        let policy = RulePolicy::new(registry());
        let p = portfolio(vec![
            balance(1, "USDC", 1_003_000_000),
            balance(1, "USDT", 997_000_000),
        ]);
        let strategy = policy.plan(&p, &target(&[("USDC", 50.0), ("USDT", 50.0)]));
        assert!(strategy.actions.is_empty());
        assert!(strategy.reasoning.contains("balanced"));
    }

    #[test]
    fn test_usdc_heavy_portfolio_is_rebalanced() {
        // 1000 USDC on Ethereum only; target 40/40/20 USDC/ETH/WETH.
        let policy = RulePolicy::new(registry());
        let p = portfolio(vec![balance(1, "USDC", 1_000_000_000)]);
        let t = target(&[("USDC", 40.0), ("ETH", 40.0), ("WETH", 20.0)]);
        let strategy = policy.plan(&p, &t);

        assert!(!strategy.actions.is_empty());
        // Never more actions than out-of-tolerance symbols (3 here).
        assert!(strategy.actions.len() <= 3);
        // At least one action moves USDC out of its chain-1 position.
        assert!(strategy
            .actions
            .iter()
            .any(|a| a.from_token == "USDC" && a.from_chain == 1));
        // The surplus is 60% of 1000 units.
        let moved: u128 = strategy
            .actions
            .iter()
            .map(|a| a.amount.parse::<u128>().unwrap())
            .sum();
        assert_eq!(moved, 600_000_000);
        assert!(strategy.validate().is_ok());
    }

    #[test]
    fn test_largest_deficit_is_served_first() {
        let policy = RulePolicy::new(registry());
        let p = portfolio(vec![balance(1, "USDC", 1_000_000_000)]);
        let t = target(&[("USDC", 40.0), ("ETH", 40.0), ("WETH", 20.0)]);
        let strategy = policy.plan(&p, &t);

        assert_eq!(strategy.actions.len(), 2);
        assert_eq!(strategy.actions[0].kind, ActionKind::Swap);
        assert_eq!(strategy.actions[0].to_token, "ETH");
        assert_eq!(strategy.actions[0].amount, "400000000");
        assert_eq!(strategy.actions[1].to_token, "WETH");
        assert_eq!(strategy.actions[1].amount, "200000000");
    }

    #[test]
    fn test_missing_target_symbol_is_fully_under_allocated() {
        // WETH is absent from the portfolio but targeted: treated as 0%
        // current share, not an error.
        let policy = RulePolicy::new(registry());
        let p = portfolio(vec![balance(1, "USDC", 1_000_000_000)]);
        let strategy = policy.plan(&p, &target(&[("USDC", 50.0), ("WETH", 50.0)]));
        assert_eq!(strategy.actions.len(), 1);
        assert_eq!(strategy.actions[0].to_token, "WETH");
    }

    #[test]
    fn test_bridge_when_deficit_token_missing_on_source_chain() {
        // All USDC sits on Base, where USDT is not listed; the policy
        // stages value with a same-token bridge to the first USDT chain.
        let policy = RulePolicy::new(registry());
        let p = portfolio(vec![balance(8453, "USDC", 1_000_000_000)]);
        let strategy = policy.plan(&p, &target(&[("USDC", 50.0), ("USDT", 50.0)]));

        assert_eq!(strategy.actions.len(), 1);
        let action = &strategy.actions[0];
        assert_eq!(action.kind, ActionKind::Bridge);
        assert_eq!(action.from_chain, 8453);
        assert_eq!(action.to_chain, 1);
        assert_eq!(action.from_token, "USDC");
        assert_eq!(action.to_token, "USDC");
        assert!(strategy.validate().is_ok());
    }

    #[test]
    fn test_shares_aggregate_across_chains() {
        use approx::assert_relative_eq;
        // 600 + 150 USDC units and 250 WETH units: 75% / 25%.
        let p = portfolio(vec![
            balance(1, "USDC", 600_000_000),
            balance(42161, "USDC", 150_000_000),
            balance(1, "WETH", 250_000_000_000_000_000_000),
        ]);
        let shares = current_shares(&p);
        assert_relative_eq!(shares["USDC"], 75.0, epsilon = 1e-9);
        assert_relative_eq!(shares["WETH"], 25.0, epsilon = 1e-9);
    }

    #[test]
    fn test_plan_is_deterministic() {
        let policy = RulePolicy::new(registry());
        let p = portfolio(vec![
            balance(1, "USDC", 1_000_000_000),
            balance(42161, "WETH", 2_000_000_000_000_000_000),
        ]);
        let t = target(&[("USDC", 30.0), ("ETH", 40.0), ("WETH", 30.0)]);

        let first = policy.plan(&p, &t);
        let second = policy.plan(&p, &t);
        assert_eq!(first.actions, second.actions);
        assert_eq!(first.reasoning, second.reasoning);
    }

    #[test]
    fn test_all_emitted_actions_are_structurally_valid() {
        let policy = RulePolicy::new(registry());
        let p = portfolio(vec![
            balance(1, "USDC", 5_000_000_000),
            balance(10, "USDC", 2_000_000_000),
            balance(42161, "WETH", 1_000_000_000_000_000_000),
        ]);
        let t = target(&[("USDC", 20.0), ("ETH", 50.0), ("WETH", 30.0)]);
        let strategy = policy.plan(&p, &t);
        for action in &strategy.actions {
            assert!(action.validate().is_ok());
        }
    }

    #[tokio::test]
    async fn test_planner_rejects_invalid_external_strategy() {
        // A generator emitting a swap across chains is a contract
        // violation and must be rejected, not repaired.
        let bad = RebalanceStrategy {
            actions: vec![RebalanceAction {
                kind: ActionKind::Swap,
                from_chain: 1,
                to_chain: 42161,
                from_token: "USDC".to_string(),
                to_token: "USDC".to_string(),
                amount: "1000".to_string(),
                amount_formatted: "0.001 USDC".to_string(),
            }],
            reasoning: "bad".to_string(),
        };
        let planner = Planner::new(Arc::new(MockGenerator::returning(bad)));
        let p = portfolio(vec![balance(1, "USDC", 1_000_000_000)]);
        let result = planner.plan(&p, &target(&[("USDC", 100.0)])).await;
        assert!(matches!(result, Err(PlanError::ContractViolation(_))));
    }

    #[tokio::test]
    async fn test_planner_accepts_valid_external_strategy() {
        let good = RebalanceStrategy {
            actions: vec![],
            reasoning: "nothing to do".to_string(),
        };
        let planner = Planner::new(Arc::new(MockGenerator::returning(good)));
        let p = portfolio(vec![balance(1, "USDC", 1_000_000_000)]);
        let strategy = planner
            .plan(&p, &target(&[("USDC", 100.0)]))
            .await
            .unwrap();
        assert_eq!(strategy.reasoning, "nothing to do");
    }
}
