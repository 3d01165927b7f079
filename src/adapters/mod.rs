//! Adapters Layer - implementations of the ports against real services.
//!
//! - `evm`: JSON-RPC balance reads per chain
//! - `lifi`: routing/quote API client
//! - `ens`: wallet name resolution
//! - `agent`: external strategy generator (LLM backend)
//! - `cli`: command parsing and terminal rendering

pub mod agent;
pub mod cli;
pub mod ens;
pub mod evm;
pub mod lifi;
