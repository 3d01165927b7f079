//! Name-resolution port (ENS-style).

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("could not resolve wallet: {0}")]
    NotFound(String),
    #[error("resolver rpc request failed: {0}")]
    Rpc(String),
}

/// A wallet identity after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedWallet {
    pub address: String,
    pub display_name: Option<String>,
}

#[async_trait]
pub trait ResolverPort: Send + Sync {
    /// Turn a human-readable name or raw address into a wallet identity.
    /// Raw addresses are reverse-resolved for a display name only.
    async fn resolve(&self, input: &str) -> Result<ResolvedWallet, ResolveError>;

    /// Look up the display name registered for `address`, if any.
    async fn reverse_resolve(&self, address: &str) -> Result<Option<String>, ResolveError>;
}
