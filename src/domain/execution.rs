//! Per-action execution outcome produced by the quote pipeline.

use serde::{Deserialize, Serialize};

use super::strategy::RebalanceAction;
use crate::ports::routing::Quote;

/// Lifecycle of one planned action.
///
/// The quote pipeline only produces `Quoted` and `Failed`; `Pending` and
/// `Success` belong to a signing/broadcast layer outside this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Quoted,
    Pending,
    Success,
    Failed,
}

/// One planned action paired with its quote outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub action: RebalanceAction,
    pub quote: Option<Quote>,
    pub status: ExecutionStatus,
}

impl ExecutionResult {
    pub fn quoted(action: RebalanceAction, quote: Quote) -> Self {
        Self {
            action,
            quote: Some(quote),
            status: ExecutionStatus::Quoted,
        }
    }

    pub fn failed(action: RebalanceAction) -> Self {
        Self {
            action,
            quote: None,
            status: ExecutionStatus::Failed,
        }
    }

    pub fn is_quoted(&self) -> bool {
        self.status == ExecutionStatus::Quoted
    }
}
