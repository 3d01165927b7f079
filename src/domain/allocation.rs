//! Target allocation: desired percentage of the portfolio per asset symbol.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AllocationError {
    #[error("negative target percentage for {symbol}: {pct}")]
    NegativePercentage { symbol: String, pct: f64 },
    #[error("non-finite target percentage for {symbol}")]
    NonFinitePercentage { symbol: String },
}

/// Desired percentage share per asset symbol.
///
/// Percentages need not sum to 100; any shortfall is an unconstrained
/// remainder. Negative or non-finite percentages are rejected at
/// construction. Iteration order is sorted by symbol so planning over the
/// same allocation is deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetAllocation(BTreeMap<String, f64>);

impl TargetAllocation {
    pub fn new(
        entries: impl IntoIterator<Item = (String, f64)>,
    ) -> Result<Self, AllocationError> {
        let mut map = BTreeMap::new();
        for (symbol, pct) in entries {
            if !pct.is_finite() {
                return Err(AllocationError::NonFinitePercentage { symbol });
            }
            if pct < 0.0 {
                return Err(AllocationError::NegativePercentage { symbol, pct });
            }
            map.insert(symbol, pct);
        }
        Ok(Self(map))
    }

    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.0.get(symbol).copied()
    }

    /// (symbol, target percentage) pairs in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(s, p)| (s.as_str(), *p))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
