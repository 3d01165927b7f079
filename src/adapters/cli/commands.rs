//! CLI Command Definitions
//!
//! Argument parsing for the chainhopper binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Chainhopper - Cross-Chain Portfolio Rebalancer
#[derive(Parser, Debug)]
#[command(
    name = "chainhopper",
    version = env!("CARGO_PKG_VERSION"),
    about = "Cross-chain portfolio rebalancer",
    long_about = "Chainhopper aggregates a wallet's balances across EVM chains, \
                  plans the minimal set of swap/bridge actions toward a target \
                  allocation, and fetches execution quotes for each action."
)]
pub struct CliApp {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the aggregated portfolio snapshot
    Portfolio(PortfolioCmd),

    /// Plan rebalancing actions without fetching quotes
    Plan(PlanCmd),

    /// Run the full pipeline: aggregate, plan, and quote every action
    Rebalance(RebalanceCmd),

    /// Get a quote for a single ad-hoc action
    Quote(QuoteCmd),

    /// Check the status of a cross-chain transfer
    Status(StatusCmd),

    /// List chains supported by the routing service
    Chains(ChainsCmd),
}

#[derive(Parser, Debug)]
pub struct PortfolioCmd {
    /// Wallet address or resolvable name (falls back to config)
    #[arg(short, long)]
    pub wallet: Option<String>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,
}

#[derive(Parser, Debug)]
pub struct PlanCmd {
    /// Wallet address or resolvable name (falls back to config)
    #[arg(short, long)]
    pub wallet: Option<String>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,
}

#[derive(Parser, Debug)]
pub struct RebalanceCmd {
    /// Wallet address or resolvable name (falls back to config)
    #[arg(short, long)]
    pub wallet: Option<String>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,
}

#[derive(Parser, Debug)]
pub struct QuoteCmd {
    /// Source chain id
    #[arg(long)]
    pub from_chain: u64,

    /// Destination chain id (same as source for a swap)
    #[arg(long)]
    pub to_chain: u64,

    /// Source token symbol
    #[arg(long)]
    pub from_token: String,

    /// Destination token symbol
    #[arg(long)]
    pub to_token: String,

    /// Amount in the source token's smallest unit
    #[arg(long)]
    pub amount: String,

    /// Wallet address the quote is for
    #[arg(short, long)]
    pub wallet: Option<String>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,
}

#[derive(Parser, Debug)]
pub struct StatusCmd {
    /// Transaction hash of the transfer
    #[arg(long)]
    pub tx_hash: String,

    /// Source chain id, if known
    #[arg(long)]
    pub from_chain: Option<u64>,

    /// Destination chain id, if known
    #[arg(long)]
    pub to_chain: Option<u64>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ChainsCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,
}
