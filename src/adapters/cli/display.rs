//! Terminal rendering of portfolios, strategies, and execution results.

use crate::domain::execution::{ExecutionResult, ExecutionStatus};
use crate::domain::portfolio::Portfolio;
use crate::domain::strategy::{ActionKind, RebalanceStrategy};

const RULE: &str = "--------------------------------------------------";

pub fn render_portfolio(portfolio: &Portfolio) {
    println!("\nPortfolio Summary");
    println!("{RULE}");
    match &portfolio.display_name {
        Some(name) => println!("Wallet: {} ({})", name, portfolio.address),
        None => println!("Wallet: {}", portfolio.address),
    }

    if portfolio.is_empty() {
        println!("No balances found");
    } else {
        for b in &portfolio.balances {
            println!(
                "{:<12} | {:<6} | {}",
                b.chain.name, b.asset.symbol, b.formatted
            );
        }
    }
    println!("{RULE}");
}

pub fn render_strategy(strategy: &RebalanceStrategy) {
    println!("\nRebalance Strategy");
    println!("{RULE}");
    println!("Reasoning: {}", strategy.reasoning);

    if strategy.actions.is_empty() {
        println!("No actions needed");
    } else {
        println!("Actions ({}):", strategy.actions.len());
        for (i, action) in strategy.actions.iter().enumerate() {
            let kind = match action.kind {
                ActionKind::Swap => "SWAP",
                ActionKind::Bridge => "BRIDGE",
            };
            println!(
                "  {}. {} {} {} -> {} (chain {} -> {})",
                i + 1,
                kind,
                action.amount_formatted,
                action.from_token,
                action.to_token,
                action.from_chain,
                action.to_chain
            );
        }
    }
    println!("{RULE}");
}

pub fn render_results(results: &[ExecutionResult]) {
    println!("\nExecution Summary");
    println!("{RULE}");

    for (i, result) in results.iter().enumerate() {
        let marker = match result.status {
            ExecutionStatus::Quoted => "ok",
            ExecutionStatus::Failed => "failed",
            ExecutionStatus::Pending => "pending",
            ExecutionStatus::Success => "done",
        };
        println!(
            "[{marker}] Action {}: {} {} -> {} (chain {} -> {})",
            i + 1,
            result.action.amount_formatted,
            result.action.from_token,
            result.action.to_token,
            result.action.from_chain,
            result.action.to_chain
        );
        if let Some(ref quote) = result.quote {
            println!(
                "     via {}: est. output {} {}, min {}",
                quote.tool,
                quote.estimate.to_amount,
                quote.action.to_token.symbol,
                quote.estimate.to_amount_min
            );
            if let Some(ref tx) = quote.transaction_request {
                println!("     transaction ready on chain {}", tx.chain_id);
            }
        }
    }

    let quoted = results.iter().filter(|r| r.is_quoted()).count();
    println!("{RULE}");
    println!("{quoted}/{} action(s) quoted", results.len());
}
