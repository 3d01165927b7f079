//! Strategy generation through an OpenAI-compatible chat-completions API.
//!
//! The backend receives the portfolio and target allocation rendered as
//! text plus a fixed rule set, and must answer with a JSON
//! `RebalanceStrategy`. Output is parsed here but validated against the
//! structural invariants by the planner, which rejects inconsistent
//! strategies outright.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::domain::allocation::TargetAllocation;
use crate::domain::portfolio::Portfolio;
use crate::domain::strategy::RebalanceStrategy;
use crate::ports::strategy::{GeneratorError, StrategyGenerator};

const SYSTEM_PROMPT: &str = "\
You are a DeFi portfolio rebalancing agent. You will receive a user's \
multi-chain portfolio balances and target allocation percentages.

Output a JSON object with:
- actions: array of rebalancing actions (swaps/bridges)
- reasoning: brief explanation of the strategy

Each action has: type (\"swap\" or \"bridge\"), fromChain, toChain, \
fromToken, toToken, amount (integer string in the source token's smallest \
unit), amountFormatted.

Rules:
- Minimize the number of transactions (gas efficiency)
- Prefer bridging over swap+bridge when moving the same token
- A bridge must keep the same token on both ends; a swap must stay on one chain
- Consider that bridging has fees
- If the portfolio is already balanced (within 2%), return empty actions
- Always output valid JSON

Chain IDs: Ethereum 1, Arbitrum 42161, Base 8453, Optimism 10.";

/// Configuration for the chat-completions backend.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl AgentConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key,
            model: "gpt-4o".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Strategy generator backed by an external chat-completions API.
#[derive(Debug, Clone)]
pub struct ExternalGenerator {
    config: AgentConfig,
    http: Client,
}

impl ExternalGenerator {
    pub fn new(config: AgentConfig) -> Result<Self, GeneratorError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GeneratorError::Backend(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { config, http })
    }
}

/// Render the portfolio for the model prompt.
fn format_portfolio(portfolio: &Portfolio) -> String {
    let mut out = format!("Wallet: {}", portfolio.address);
    if let Some(ref name) = portfolio.display_name {
        out.push_str(&format!(" ({name})"));
    }
    out.push_str("\n\nCurrent Balances:\n");

    if portfolio.is_empty() {
        out.push_str("  No balances found\n");
    } else {
        for b in &portfolio.balances {
            out.push_str(&format!(
                "  - {} ({}): {} {}\n",
                b.chain.name, b.chain.id, b.formatted, b.asset.symbol
            ));
        }
    }
    out
}

fn format_target(target: &TargetAllocation) -> String {
    let mut out = String::from("Target Allocation:\n");
    for (symbol, pct) in target.iter() {
        out.push_str(&format!("  - {symbol}: {pct}%\n"));
    }
    out
}

#[async_trait]
impl StrategyGenerator for ExternalGenerator {
    async fn generate(
        &self,
        portfolio: &Portfolio,
        target: &TargetAllocation,
    ) -> Result<RebalanceStrategy, GeneratorError> {
        let user_prompt = format!(
            "{}\n{}\nAnalyze this portfolio and generate a rebalancing strategy to \
             achieve the target allocation. Output only valid JSON matching the \
             schema described.",
            format_portfolio(portfolio),
            format_target(target)
        );

        tracing::debug!(model = %self.config.model, "requesting strategy from backend");

        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_prompt },
            ],
            "response_format": { "type": "json_object" },
            "temperature": 0.3,
        });

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GeneratorError::Backend(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(GeneratorError::Backend(format!("HTTP {status}: {text}")));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| GeneratorError::Backend(format!("malformed API response: {e}")))?;

        let content = chat
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or_else(|| GeneratorError::Backend("empty response from backend".to_string()))?;

        serde_json::from_str(content)
            .map_err(|e| GeneratorError::UnparseableOutput(format!("{e}: {content}")))
    }
}
