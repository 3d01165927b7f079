//! Token balance as read from one chain.

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

use super::asset::{Asset, Chain};

/// The quantity of one asset held on one chain.
///
/// `raw` is the on-chain integer in the asset's smallest unit; `formatted`
/// is the decimal-scaled human-readable amount derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBalance {
    pub chain: Chain,
    pub asset: Asset,
    pub raw: BigUint,
    pub formatted: String,
}

impl TokenBalance {
    pub fn new(chain: Chain, asset: Asset, raw: BigUint) -> Self {
        let formatted = format_units(&raw, asset.decimals);
        Self {
            chain,
            asset,
            raw,
            formatted,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    /// The balance expressed in whole token units (raw scaled by decimals).
    ///
    /// Lossy for quantities beyond f64 precision; used only for allocation
    /// percentages, never to produce transaction amounts.
    pub fn units(&self) -> f64 {
        let raw = self.raw.to_f64().unwrap_or(f64::MAX);
        raw / 10f64.powi(self.asset.decimals as i32)
    }
}

/// Render a raw integer quantity as a decimal string using `decimals`
/// fractional digits, trimming trailing zeros ("1500000" @ 6 -> "1.5").
pub fn format_units(raw: &BigUint, decimals: u8) -> String {
    let divisor = BigUint::from(10u32).pow(decimals as u32);
    let whole = raw / &divisor;
    let frac = raw % &divisor;

    if frac.is_zero() {
        return whole.to_string();
    }

    let frac_str = format!("{:0>width$}", frac.to_string(), width = decimals as usize);
    let trimmed = frac_str.trim_end_matches('0');
    format!("{}.{}", whole, trimmed)
}

/// Parse a decimal token amount into its raw integer representation.
/// Truncates fractional digits beyond `decimals`.
pub fn parse_units(amount: f64, decimals: u8) -> BigUint {
    let scaled = amount * 10f64.powi(decimals as i32);
    // Negative or non-finite inputs clamp to zero; callers validate upstream.
    if !scaled.is_finite() || scaled <= 0.0 {
        return BigUint::zero();
    }
    BigUint::from(scaled.round() as u128)
}
