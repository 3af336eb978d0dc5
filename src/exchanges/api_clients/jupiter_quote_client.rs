use async_trait::async_trait;
use anyhow::{Result, anyhow};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

use crate::config::QuotesCfg;
use super::QuoteApiClient;

/// Quote response from the Jupiter API. The endpoint returns far more fields;
/// only the output amount matters here.
#[derive(Debug, Deserialize)]
struct JupiterQuoteResponse {
    #[serde(rename = "outAmount")]
    out_amount: String,
}

/// Jupiter Quote API client
///
/// One request per liquidity source: the `dexes` parameter restricts routing
/// to that single venue, which makes the returned output amounts comparable
/// across sources for the same notional input.
pub struct JupiterQuoteClient {
    http_client: Client,
    base_url: String,
    input_mint: String,
    output_mint: String,
    amount: u64,
    output_factor: f64,
    timeout: Duration,
}

impl JupiterQuoteClient {
    pub fn new(cfg: &QuotesCfg) -> Self {
        Self {
            http_client: Client::new(),
            base_url: cfg.base_url.clone(),
            input_mint: cfg.input_mint.clone(),
            output_mint: cfg.output_mint.clone(),
            amount: cfg.amount,
            output_factor: 10f64.powi(cfg.output_decimals as i32),
            timeout: Duration::from_millis(cfg.timeout_ms),
        }
    }
}

#[async_trait]
impl QuoteApiClient for JupiterQuoteClient {
    async fn fetch_price(&self, source: &str) -> Result<f64> {
        let url = format!("{}/quote", self.base_url);
        let amount = self.amount.to_string();

        info!("🔍 Fetching {} quote from {}", source, url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("inputMint", self.input_mint.as_str()),
                ("outputMint", self.output_mint.as_str()),
                ("amount", amount.as_str()),
                ("swapMode", "ExactIn"),
                ("onlyDirectRoutes", "false"),
                ("platformFeeBps", "0"),
                ("dexes", source),
            ])
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "quote request for {} failed with status: {}",
                source,
                response.status()
            ));
        }

        let quote: JupiterQuoteResponse = response.json().await?;
        let out_amount: f64 = quote
            .out_amount
            .parse()
            .map_err(|e| anyhow!("malformed outAmount in quote response: {}", e))?;

        let price = out_amount / self.output_factor;
        info!("✅ {} quoted {:.6} output units", source, price);
        Ok(price)
    }
}
