//! Chainhopper - Cross-Chain Portfolio Rebalancer Library
//!
//! Aggregates a wallet's token balances across EVM chains, plans the
//! minimal set of swap/bridge actions toward a target allocation, and
//! fetches an execution quote for every planned action.
//!
//! # Modules
//!
//! - `domain`: Core types (Chain, Asset, TokenBalance, Portfolio, RebalanceStrategy)
//! - `ports`: Trait abstractions (BalancePort, RoutingPort, ResolverPort, StrategyGenerator)
//! - `registry`: The static chain/token registry driving aggregation
//! - `adapters`: External implementations (EVM JSON-RPC, LI.FI, ENS, agent, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: Aggregator, planner, quote pipeline, and orchestrator

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod registry;
