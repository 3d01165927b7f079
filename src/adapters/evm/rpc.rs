//! Minimal EVM JSON-RPC client for read-only balance queries.
//!
//! Speaks plain `eth_getBalance` / `eth_call` over HTTP. One client per
//! chain endpoint, constructed once at startup and injected wherever reads
//! are needed.

use std::time::Duration;

use num_bigint::BigUint;
use num_traits::Zero;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::ports::balance::BalanceError;

/// Function selector for ERC-20 `balanceOf(address)`.
const BALANCE_OF_SELECTOR: &str = "0x70a08231";

const RPC_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// Read-only JSON-RPC client for one chain endpoint.
#[derive(Debug, Clone)]
pub struct EvmRpcClient {
    http: Client,
    url: String,
}

impl EvmRpcClient {
    pub fn new(url: String) -> Result<Self, BalanceError> {
        let http = Client::builder()
            .timeout(RPC_TIMEOUT)
            .build()
            .map_err(|e| BalanceError::Rpc(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { http, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Native currency balance of `address`, in wei.
    pub async fn native_balance(&self, address: &str) -> Result<BigUint, BalanceError> {
        let result = self
            .call("eth_getBalance", json!([address, "latest"]))
            .await?;
        parse_hex_quantity(&result)
    }

    /// ERC-20 balance of `address` on the `token` contract.
    pub async fn erc20_balance(
        &self,
        token: &str,
        address: &str,
    ) -> Result<BigUint, BalanceError> {
        let data = balance_of_calldata(address)?;
        let result = self.eth_call(token, &data).await?;
        parse_hex_quantity(&result)
    }

    /// Raw `eth_call` against `to` with pre-encoded calldata. Returns the
    /// hex-encoded return data.
    pub async fn eth_call(&self, to: &str, data: &str) -> Result<String, BalanceError> {
        let params = json!([{ "to": to, "data": data }, "latest"]);
        self.call("eth_call", params).await
    }

    async fn call(&self, method: &str, params: Value) -> Result<String, BalanceError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| BalanceError::Rpc(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BalanceError::Rpc(format!(
                "{} returned HTTP {}",
                method,
                response.status()
            )));
        }

        let parsed: RpcResponse = response
            .json()
            .await
            .map_err(|e| BalanceError::MalformedResponse(e.to_string()))?;

        if let Some(err) = parsed.error {
            return Err(BalanceError::Rpc(format!(
                "{} failed: {} (code {})",
                method, err.message, err.code
            )));
        }

        match parsed.result {
            Some(Value::String(hex)) => Ok(hex),
            other => Err(BalanceError::MalformedResponse(format!(
                "{} returned non-string result: {:?}",
                method, other
            ))),
        }
    }
}

/// ABI-encode a `balanceOf(address)` call: selector + address left-padded
/// to 32 bytes.
fn balance_of_calldata(address: &str) -> Result<String, BalanceError> {
    let stripped = address
        .strip_prefix("0x")
        .ok_or_else(|| BalanceError::InvalidAddress(address.to_string()))?;
    if stripped.len() != 40 || !stripped.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(BalanceError::InvalidAddress(address.to_string()));
    }
    Ok(format!(
        "{}{:0>64}",
        BALANCE_OF_SELECTOR,
        stripped.to_lowercase()
    ))
}

/// Parse an `0x`-prefixed hex quantity into a big integer. An empty `0x`
/// (returned by some nodes for empty call results) reads as zero.
fn parse_hex_quantity(hex: &str) -> Result<BigUint, BalanceError> {
    let digits = hex
        .strip_prefix("0x")
        .ok_or_else(|| BalanceError::MalformedResponse(format!("not a hex quantity: {hex}")))?;
    if digits.is_empty() {
        return Ok(BigUint::zero());
    }
    BigUint::parse_bytes(digits.as_bytes(), 16)
        .ok_or_else(|| BalanceError::MalformedResponse(format!("not a hex quantity: {hex}")))
}
