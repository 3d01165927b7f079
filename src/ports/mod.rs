//! Ports Layer - Trait definitions for external dependencies
//!
//! This module defines the interfaces (ports) that adapters must implement.
//! Following hexagonal architecture, these traits abstract:
//! - Per-chain balance reads (JSON-RPC endpoints)
//! - Routing/quote lookups (LI.FI-style API)
//! - Wallet name resolution (ENS)
//! - Strategy generation (rule policy or external backend)

pub mod balance;
pub mod mocks;
pub mod resolver;
pub mod routing;
pub mod strategy;

pub use balance::{BalanceError, BalancePort};
pub use resolver::{ResolveError, ResolvedWallet, ResolverPort};
pub use routing::{Quote, RoutingError, RoutingPort};
pub use strategy::{GeneratorError, StrategyGenerator};
