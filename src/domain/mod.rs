//! Domain Layer - Core types for cross-chain portfolio rebalancing
//!
//! Pure data types and structural validation with no I/O. All external
//! interactions happen through the ports layer.

pub mod allocation;
pub mod asset;
pub mod balance;
pub mod execution;
pub mod portfolio;
pub mod strategy;

pub use allocation::{AllocationError, TargetAllocation};
pub use asset::{is_valid_address, Asset, Chain, NATIVE_ASSET_ADDRESS};
pub use balance::{format_units, parse_units, TokenBalance};
pub use execution::{ExecutionResult, ExecutionStatus};
pub use portfolio::Portfolio;
pub use strategy::{ActionKind, RebalanceAction, RebalanceStrategy, StrategyError};
