//! Chainhopper - Cross-Chain Portfolio Rebalancer
//!
//! Aggregates a wallet's balances across EVM chains, plans swap/bridge
//! actions toward a target allocation, and quotes each action via LI.FI.

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use num_bigint::BigUint;
use tracing_subscriber::{fmt, EnvFilter};

use chainhopper::adapters::agent::{AgentConfig, ExternalGenerator};
use chainhopper::adapters::cli::{
    display, ChainsCmd, CliApp, Command, PlanCmd, PortfolioCmd, QuoteCmd, RebalanceCmd, StatusCmd,
};
use chainhopper::adapters::ens::EnsResolver;
use chainhopper::adapters::evm::rpc::EvmRpcClient;
use chainhopper::adapters::evm::EvmBalanceSource;
use chainhopper::adapters::lifi::{LifiClient, LifiConfig};
use chainhopper::application::aggregator::PortfolioAggregator;
use chainhopper::application::planner::Planner;
use chainhopper::application::quotes::QuotePipeline;
use chainhopper::application::orchestrator::RebalanceOrchestrator;
use chainhopper::config::{load_config, Config};
use chainhopper::domain::allocation::TargetAllocation;
use chainhopper::domain::balance::format_units;
use chainhopper::domain::strategy::{ActionKind, RebalanceAction};
use chainhopper::ports::resolver::ResolverPort;
use chainhopper::ports::routing::RoutingPort;
use chainhopper::registry::Registry;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (secrets go here, not in config.toml)
    dotenvy::dotenv().ok();

    let app = CliApp::parse();
    init_logging(app.verbose, app.debug);

    match app.command {
        Command::Portfolio(cmd) => portfolio_command(cmd).await,
        Command::Plan(cmd) => plan_command(cmd).await,
        Command::Rebalance(cmd) => rebalance_command(cmd).await,
        Command::Quote(cmd) => quote_command(cmd).await,
        Command::Status(cmd) => status_command(cmd).await,
        Command::Chains(cmd) => chains_command(cmd).await,
    }
}

fn init_logging(verbose: bool, debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new("warn")
    };

    fmt().with_env_filter(filter).init();
}

async fn portfolio_command(cmd: PortfolioCmd) -> Result<()> {
    let config = load_config(&cmd.config).context("Failed to load configuration")?;

    let registry = Arc::new(Registry::mainnet());
    let resolver = build_resolver(&config)?;
    let aggregator = build_aggregator(&config, registry)?;

    let wallet_input = cmd.wallet.unwrap_or_else(|| config.wallet.address.clone());
    let wallet = resolver
        .resolve(&wallet_input)
        .await
        .with_context(|| format!("Failed to resolve wallet '{wallet_input}'"))?;

    let portfolio = aggregator
        .aggregate(&wallet.address, wallet.display_name)
        .await
        .context("Failed to aggregate portfolio")?;

    display::render_portfolio(&portfolio);
    Ok(())
}

async fn plan_command(cmd: PlanCmd) -> Result<()> {
    let config = load_config(&cmd.config).context("Failed to load configuration")?;

    let registry = Arc::new(Registry::mainnet());
    let resolver = build_resolver(&config)?;
    let aggregator = build_aggregator(&config, registry.clone())?;
    let planner = build_planner(&config, registry)?;
    let target = target_allocation(&config)?;

    let wallet_input = cmd.wallet.unwrap_or_else(|| config.wallet.address.clone());
    let wallet = resolver
        .resolve(&wallet_input)
        .await
        .with_context(|| format!("Failed to resolve wallet '{wallet_input}'"))?;

    let portfolio = aggregator
        .aggregate(&wallet.address, wallet.display_name)
        .await
        .context("Failed to aggregate portfolio")?;

    let strategy = planner
        .plan(&portfolio, &target)
        .await
        .context("Failed to generate rebalance strategy")?;

    display::render_portfolio(&portfolio);
    display::render_strategy(&strategy);
    Ok(())
}

async fn rebalance_command(cmd: RebalanceCmd) -> Result<()> {
    let config = load_config(&cmd.config).context("Failed to load configuration")?;

    let registry = Arc::new(Registry::mainnet());
    let resolver: Arc<dyn ResolverPort> = Arc::new(build_resolver(&config)?);
    let aggregator = build_aggregator(&config, registry.clone())?;
    let planner = build_planner(&config, registry)?;
    let target = target_allocation(&config)?;
    let pipeline = QuotePipeline::new(Arc::new(build_lifi_client(&config)?));

    let orchestrator = RebalanceOrchestrator::new(resolver, aggregator, planner, pipeline);

    let wallet_input = cmd.wallet.unwrap_or_else(|| config.wallet.address.clone());
    let outcome = orchestrator
        .run(&wallet_input, &target)
        .await
        .context("Rebalance run failed")?;

    display::render_portfolio(&outcome.portfolio);
    display::render_strategy(&outcome.strategy);
    if !outcome.results.is_empty() {
        display::render_results(&outcome.results);
    }
    Ok(())
}

async fn quote_command(cmd: QuoteCmd) -> Result<()> {
    let config = load_config(&cmd.config).context("Failed to load configuration")?;
    let registry = Registry::mainnet();

    let raw = BigUint::from_str(&cmd.amount)
        .map_err(|_| anyhow::anyhow!("amount must be an integer in the token's smallest unit"))?;
    let asset = registry
        .asset_on(cmd.from_chain, &cmd.from_token)
        .with_context(|| {
            format!(
                "token {} is not listed on chain {}",
                cmd.from_token, cmd.from_chain
            )
        })?;

    let kind = if cmd.from_chain == cmd.to_chain {
        ActionKind::Swap
    } else {
        ActionKind::Bridge
    };
    let action = RebalanceAction {
        kind,
        from_chain: cmd.from_chain,
        to_chain: cmd.to_chain,
        from_token: cmd.from_token.clone(),
        to_token: cmd.to_token.clone(),
        amount: cmd.amount.clone(),
        amount_formatted: format!("{} {}", format_units(&raw, asset.decimals), cmd.from_token),
    };
    action
        .validate()
        .context("Requested action is not executable")?;

    let wallet = match cmd.wallet {
        Some(w) => {
            let resolver = build_resolver(&config)?;
            resolver
                .resolve(&w)
                .await
                .with_context(|| format!("Failed to resolve wallet '{w}'"))?
                .address
        }
        None => config.wallet.address.clone(),
    };

    let client = build_lifi_client(&config)?;
    let quote = client
        .quote(&action, &wallet)
        .await
        .context("Failed to fetch quote")?;

    println!("\nQuote via {}", quote.tool);
    println!(
        "  {} {} -> est. {} {} (min {})",
        action.amount_formatted,
        action.from_token,
        quote.estimate.to_amount,
        quote.action.to_token.symbol,
        quote.estimate.to_amount_min
    );
    if let Some(ref tx) = quote.transaction_request {
        println!("  transaction ready on chain {}", tx.chain_id);
    }
    Ok(())
}

async fn status_command(cmd: StatusCmd) -> Result<()> {
    let config = load_config(&cmd.config).context("Failed to load configuration")?;
    let client = build_lifi_client(&config)?;

    let status = client
        .transfer_status(&cmd.tx_hash, cmd.from_chain, cmd.to_chain)
        .await
        .context("Failed to fetch transfer status")?;

    println!("Transfer {}: {}", cmd.tx_hash, status.status);
    if let Some(sub) = status.substatus {
        println!("  {sub}");
    }
    Ok(())
}

async fn chains_command(cmd: ChainsCmd) -> Result<()> {
    let config = load_config(&cmd.config).context("Failed to load configuration")?;
    let client = build_lifi_client(&config)?;

    let chains = client
        .supported_chains()
        .await
        .context("Failed to fetch supported chains")?;

    println!("Supported chains ({}):", chains.len());
    for chain in chains {
        println!("  {:>8}  {:<12} {}", chain.id, chain.key, chain.name);
    }
    Ok(())
}

fn build_aggregator(config: &Config, registry: Arc<Registry>) -> Result<PortfolioAggregator> {
    let mut source = EvmBalanceSource::new();
    for (chain_id, url) in config.rpc.parsed_endpoints()? {
        source = source
            .with_endpoint(chain_id, &url)
            .with_context(|| format!("Bad RPC endpoint for chain {chain_id}"))?;
    }
    Ok(PortfolioAggregator::new(registry, Arc::new(source)))
}

fn build_resolver(config: &Config) -> Result<EnsResolver> {
    // Name resolution always goes through Ethereum mainnet.
    let url = config
        .rpc
        .endpoints
        .get("1")
        .cloned()
        .unwrap_or_else(|| "https://eth.llamarpc.com".to_string());
    let client = EvmRpcClient::new(url).context("Failed to create mainnet RPC client")?;
    Ok(EnsResolver::new(client))
}

fn build_planner(config: &Config, registry: Arc<Registry>) -> Result<Planner> {
    match config.strategy.mode.as_str() {
        "rules" => Ok(Planner::rule_based(registry)),
        "external" => {
            let api_key = std::env::var("OPENAI_API_KEY")
                .context("OPENAI_API_KEY must be set for the external strategy mode")?;
            let mut agent_config = AgentConfig::new(api_key);
            agent_config.model = config.strategy.model.clone();
            let generator =
                ExternalGenerator::new(agent_config).context("Failed to create strategy backend")?;
            Ok(Planner::new(Arc::new(generator)))
        }
        other => bail!("unknown strategy mode '{other}'"),
    }
}

fn build_lifi_client(config: &Config) -> Result<LifiClient> {
    let lifi_config = LifiConfig {
        api_base_url: config.lifi.api_url.clone(),
        api_key: std::env::var("LIFI_API_KEY").ok(),
        ..LifiConfig::default()
    };
    LifiClient::with_config(lifi_config).context("Failed to create routing client")
}

fn target_allocation(config: &Config) -> Result<TargetAllocation> {
    TargetAllocation::new(
        config
            .strategy
            .target
            .iter()
            .map(|(s, p)| (s.clone(), *p)),
    )
    .context("Invalid target allocation")
}
