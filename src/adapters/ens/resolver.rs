//! ENS resolution over mainnet JSON-RPC.
//!
//! Forward resolution walks the ENS registry: `resolver(namehash(name))`
//! then `addr(node)` on the returned resolver. Reverse resolution reads the
//! `name(node)` record of `<address>.addr.reverse`. Resolution always runs
//! against Ethereum mainnet regardless of which chains are aggregated.

use alloy_primitives::{hex, keccak256};
use async_trait::async_trait;

use crate::adapters::evm::rpc::EvmRpcClient;
use crate::domain::asset::is_valid_address;
use crate::ports::resolver::{ResolveError, ResolvedWallet, ResolverPort};

/// ENS registry contract on Ethereum mainnet.
const ENS_REGISTRY: &str = "0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e";

/// `resolver(bytes32)` selector
const RESOLVER_SELECTOR: &str = "0x0178b8bf";
/// `addr(bytes32)` selector
const ADDR_SELECTOR: &str = "0x3b3b57de";
/// `name(bytes32)` selector
const NAME_SELECTOR: &str = "0x691f3431";

/// ENS resolver backed by a mainnet RPC client.
#[derive(Debug, Clone)]
pub struct EnsResolver {
    client: EvmRpcClient,
}

impl EnsResolver {
    pub fn new(mainnet_client: EvmRpcClient) -> Self {
        Self {
            client: mainnet_client,
        }
    }

    async fn resolver_of(&self, node: &[u8; 32]) -> Result<Option<String>, ResolveError> {
        let data = format!("{}{}", RESOLVER_SELECTOR, hex::encode(node));
        let result = self
            .client
            .eth_call(ENS_REGISTRY, &data)
            .await
            .map_err(|e| ResolveError::Rpc(e.to_string()))?;
        Ok(decode_address_word(&result))
    }

    async fn forward_addr(
        &self,
        resolver: &str,
        node: &[u8; 32],
    ) -> Result<Option<String>, ResolveError> {
        let data = format!("{}{}", ADDR_SELECTOR, hex::encode(node));
        let result = self
            .client
            .eth_call(resolver, &data)
            .await
            .map_err(|e| ResolveError::Rpc(e.to_string()))?;
        Ok(decode_address_word(&result))
    }

    async fn reverse_name(
        &self,
        resolver: &str,
        node: &[u8; 32],
    ) -> Result<Option<String>, ResolveError> {
        let data = format!("{}{}", NAME_SELECTOR, hex::encode(node));
        let result = self
            .client
            .eth_call(resolver, &data)
            .await
            .map_err(|e| ResolveError::Rpc(e.to_string()))?;
        Ok(decode_string_return(&result))
    }
}

#[async_trait]
impl ResolverPort for EnsResolver {
    async fn resolve(&self, input: &str) -> Result<ResolvedWallet, ResolveError> {
        // Raw addresses only get a reverse lookup for a display name; a
        // failed reverse lookup never fails resolution.
        if is_valid_address(input) {
            let display_name = self.reverse_resolve(input).await.unwrap_or_else(|e| {
                tracing::debug!("reverse resolution failed for {input}: {e}");
                None
            });
            return Ok(ResolvedWallet {
                address: input.to_string(),
                display_name,
            });
        }

        let name = input.trim().to_lowercase();
        let node = namehash(&name);

        let resolver = self
            .resolver_of(&node)
            .await?
            .ok_or_else(|| ResolveError::NotFound(input.to_string()))?;

        let address = self
            .forward_addr(&resolver, &node)
            .await?
            .ok_or_else(|| ResolveError::NotFound(input.to_string()))?;

        tracing::info!("resolved {name} -> {address}");
        Ok(ResolvedWallet {
            address,
            display_name: Some(name),
        })
    }

    async fn reverse_resolve(&self, address: &str) -> Result<Option<String>, ResolveError> {
        let hex_part = address.strip_prefix("0x").unwrap_or(address).to_lowercase();
        let reverse_name = format!("{hex_part}.addr.reverse");
        let node = namehash(&reverse_name);

        let Some(resolver) = self.resolver_of(&node).await? else {
            return Ok(None);
        };
        self.reverse_name(&resolver, &node).await
    }
}

/// ENS namehash: fold keccak256 over the labels, rightmost first.
fn namehash(name: &str) -> [u8; 32] {
    let mut node = [0u8; 32];
    if name.is_empty() {
        return node;
    }
    for label in name.split('.').rev() {
        let label_hash = keccak256(label.as_bytes());
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(&node);
        buf[32..].copy_from_slice(label_hash.as_slice());
        node.copy_from_slice(keccak256(buf).as_slice());
    }
    node
}

/// Decode a single ABI word holding an address; zero address reads as None.
fn decode_address_word(hex_result: &str) -> Option<String> {
    let digits = hex_result.strip_prefix("0x")?;
    if digits.len() < 64 {
        return None;
    }
    let word = &digits[..64];
    let addr = &word[24..64];
    if addr.chars().all(|c| c == '0') {
        return None;
    }
    Some(format!("0x{addr}"))
}

/// Decode an ABI-encoded `string` return value (offset word, length word,
/// then UTF-8 bytes). Empty strings read as None.
fn decode_string_return(hex_result: &str) -> Option<String> {
    let digits = hex_result.strip_prefix("0x")?;
    let bytes = hex::decode(digits).ok()?;
    if bytes.len() < 64 {
        return None;
    }
    let len = u64::from_be_bytes(bytes[56..64].try_into().ok()?) as usize;
    if len == 0 || bytes.len() < 64 + len {
        return None;
    }
    String::from_utf8(bytes[64..64 + len].to_vec()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namehash_known_vectors() {
        // Reference vectors from EIP-137
        assert_eq!(namehash(""), [0u8; 32]);
        assert_eq!(
            hex::encode(namehash("eth")),
            "93cdeb708b7545dc668eb9280176169d1c33cfd8ed6f04690a0bcc88a93fc4ae"
        );
        assert_eq!(
            hex::encode(namehash("foo.eth")),
            "de9b09fd7c5f901e23a3f19fecc54828e9c848539801e86591bd9801b019f84f"
        );
    }

    #[test]
    fn test_decode_address_word() {
        let word = format!("0x{:0>64}", "d8da6bf26964af9d7eed9e03e53415d37aa96045");
        assert_eq!(
            decode_address_word(&word),
            Some("0xd8da6bf26964af9d7eed9e03e53415d37aa96045".to_string())
        );
        assert_eq!(decode_address_word(&format!("0x{:0>64}", "0")), None);
        assert_eq!(decode_address_word("0x"), None);
    }

    #[test]
    fn test_decode_string_return() {
        // ABI encoding of "vitalik.eth"
        let offset = format!("{:0>64x}", 32);
        let len = format!("{:0>64x}", 11);
        let body = format!("{:0<64}", hex::encode("vitalik.eth"));
        let encoded = format!("0x{offset}{len}{body}");
        assert_eq!(
            decode_string_return(&encoded),
            Some("vitalik.eth".to_string())
        );

        let empty = format!("0x{}{:0>64x}", format!("{:0>64x}", 32), 0);
        assert_eq!(decode_string_return(&empty), None);
    }
}
