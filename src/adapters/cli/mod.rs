//! CLI adapter: argument parsing and terminal output.

pub mod commands;
pub mod display;

pub use commands::{
    ChainsCmd, CliApp, Command, PlanCmd, PortfolioCmd, QuoteCmd, RebalanceCmd, StatusCmd,
};
